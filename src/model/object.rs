use std::time::{Duration, SystemTime};

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

/// Presigned URLs expire after 15 minutes unless told otherwise.
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(900);

/// Addresses a single object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectParams {
    pub bucket: String,
    pub key: String,
    pub version_id: Option<String>,
}

impl ObjectParams {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            version_id: None,
        }
    }

    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    pub fn is_addressable(&self) -> bool {
        !self.bucket.is_empty() && !self.key.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.version_id.as_deref().filter(|v| !v.is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReturnType {
    #[default]
    Stream,
    String,
    Buffer,
}

/// Object body in the shape requested through [`ReturnType`].
#[derive(Debug)]
pub enum FileContents {
    Stream(ByteStream),
    String(String),
    Buffer(Bytes),
}

impl FileContents {
    pub fn into_stream(self) -> Option<ByteStream> {
        match self {
            FileContents::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            FileContents::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_buffer(self) -> Option<Bytes> {
        match self {
            FileContents::Buffer(b) => Some(b),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresignOptions {
    pub expires_in: Duration,
}

impl PresignOptions {
    pub fn expires_in(expires_in: Duration) -> Self {
        Self { expires_in }
    }
}

impl Default for PresignOptions {
    fn default() -> Self {
        Self {
            expires_in: DEFAULT_PRESIGN_EXPIRY,
        }
    }
}

/// One entry of a bucket listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub last_modified: SystemTime,
    pub e_tag: Option<String>,
}
