use crate::model::{error::S3ClientError, object::ObjectParams};

const S3_SCHEME: &str = "s3://";

pub fn parse_object_uri(object_uri: &str) -> Result<ObjectParams, S3ClientError> {
    let rest = match object_uri.strip_prefix(S3_SCHEME) {
        Some(rest) => rest,
        None => {
            return Err(S3ClientError::invalid_params(
                "Couldn't parse S3 object URI",
                &format!("Expected an s3:// URI. Received: {}", object_uri),
            ))
        }
    };

    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));

    Ok(ObjectParams::new(bucket, key))
}
