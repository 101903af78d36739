use std::{error::Error as StdError, fmt};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub const DEFAULT_MESSAGE: &str = "There was an error with the S3 client";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client could not be built from the given configuration.
    Configuration,
    /// A required argument was missing or malformed.
    InvalidParams,
    /// The SDK rejected or failed the request.
    Request,
    /// The object body could not be read.
    Body,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::InvalidParams => "invalid_params",
            ErrorKind::Request => "request",
            ErrorKind::Body => "body",
        };
        f.write_str(s)
    }
}

/// The single error type returned by every [`crate::S3Client`] operation.
///
/// Carries a human readable `message` describing what the client was trying
/// to do, and optionally the underlying `cause` (a plain reason string or the
/// SDK error), which is exposed through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct S3ClientError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl S3ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            kind,
            message,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn configuration(reason: &str) -> Self {
        Self::new(
            ErrorKind::Configuration,
            "The S3 client couldn't be configured properly",
        )
        .with_cause(reason)
    }

    pub fn invalid_params(message: &str, reason: &str) -> Self {
        Self::new(ErrorKind::InvalidParams, message).with_cause(reason)
    }

    pub fn request(message: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Request, message).with_cause(cause)
    }

    pub fn body(message: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Body, message).with_cause(cause)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Renders the cause chain after the message, e.g. for log lines.
    pub fn detailed(&self) -> String {
        let mut out = self.message.clone();
        let mut source = self.source();
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }

        out
    }
}
