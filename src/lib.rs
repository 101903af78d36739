//! Validating wrapper around the AWS S3 SDK client.
//!
//! [`S3Client`] checks the arguments of each call, builds the matching SDK
//! request and awaits it. Object bodies can be returned as the raw stream or
//! collected into a string or a buffer.
//!
//! ```no_run
//! use s3client::{ClientConfig, Credentials, ObjectParams, ReturnType, S3Client};
//!
//! # async fn run() -> Result<(), s3client::S3ClientError> {
//! let client = S3Client::new(ClientConfig::new(
//!     "eu-west-1",
//!     Credentials::new("AKIDEXAMPLE", "secret"),
//! ))?;
//!
//! let params = ObjectParams::new("my-bucket", "reports/today.csv");
//! client.upload_file(b"a,b,c\n".to_vec(), &params).await?;
//!
//! let body = client.read_file(&params, ReturnType::String).await?;
//! let url = client.get_presigned_url(&params, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod client;
pub mod model;
pub mod util;

pub use adapters::ObjectStore;
pub use client::S3Client;
pub use model::{
    config::{ClientConfig, Credentials, SdkOverrides},
    error::{ErrorKind, S3ClientError},
    object::{FileContents, ObjectParams, ObjectSummary, PresignOptions, ReturnType},
};
