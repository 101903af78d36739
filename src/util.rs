pub mod object;
pub mod stream;
