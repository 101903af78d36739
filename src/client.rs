use std::time::SystemTime;

use aws_config::SdkConfig;
use aws_sdk_s3::{
    config::{BehaviorVersion, Builder, Credentials, Region},
    error::SdkError,
    operation::{
        create_bucket::CreateBucketOutput, delete_bucket::DeleteBucketOutput,
        delete_object::DeleteObjectOutput, put_object::PutObjectOutput,
    },
    presigning::PresigningConfig,
    primitives::{ByteStream, DateTime},
};
use bytes::Bytes;
use tracing::{error, info, instrument};

use crate::{
    adapters::ObjectStore,
    model::{
        config::{ClientConfig, SdkOverrides},
        error::{ErrorKind, S3ClientError},
        object::{FileContents, ObjectParams, ObjectSummary, PresignOptions, ReturnType},
    },
    util::stream::{body_stream, stream_to_buffer, stream_to_string},
};

const PROVIDER_NAME: &str = "s3client";

/// S3 rejects an explicit location constraint for its default region.
const DEFAULT_REGION: &str = "us-east-1";

const MISSING_REGION: &str = "Missing AWS S3 buckets region";
const MISSING_CREDENTIALS: &str = "Missing AWS Access Key ID and/or Secret Access Key";
const MISSING_OBJECT: &str = "Missing object bucket and/or key";
const MISSING_DESTINATION: &str = "Missing object destination bucket and/or key";
const MISSING_BUCKET: &str = "Missing bucket";
const MISSING_BUCKET_NAME: &str = "Missing bucket name";

const PRESIGN_FAILED: &str = "Couldn't generate pre-signed URL";
const PRESIGN_UPLOAD_FAILED: &str = "Couldn't generate pre-signed upload URL";
const READ_FAILED: &str = "Couldn't access S3 file to read";
const UPLOAD_FAILED: &str = "Couldn't upload file to S3";
const DELETE_FAILED: &str = "Couldn't delete S3 file";
const EXISTS_FAILED: &str = "Couldn't check S3 file";
const LIST_FAILED: &str = "Couldn't list S3 files";
const CREATE_BUCKET_FAILED: &str = "Couldn't create S3 bucket";
const DELETE_BUCKET_FAILED: &str = "Couldn't delete S3 bucket";
const BUCKET_EXISTS_FAILED: &str = "Couldn't check S3 bucket";

/// Validating façade over an S3 client.
///
/// Every operation checks its arguments first and only then issues a single
/// request through the wrapped [`ObjectStore`]. Failures of either kind come
/// back as [`S3ClientError`].
pub struct S3Client {
    store: Box<dyn ObjectStore>,
    region: String,
}

impl S3Client {
    /// Builds an SDK client from static credentials.
    pub fn new(config: ClientConfig) -> Result<Self, S3ClientError> {
        let region = match config.region() {
            None => return Err(configuration_failed(MISSING_REGION)),
            Some(region) => region.to_string(),
        };

        if !config.credentials.is_complete() {
            return Err(configuration_failed(MISSING_CREDENTIALS));
        }

        let credentials = Credentials::new(
            config.credentials.access_key_id,
            config.credentials.secret_access_key,
            config.credentials.session_token,
            None,
            PROVIDER_NAME,
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style);

        if let Some(endpoint_url) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        info!(region = %region, "configured");

        Ok(Self {
            store: Box::new(aws_sdk_s3::Client::from_conf(builder.build())),
            region,
        })
    }

    /// Builds an SDK client from an already loaded `aws-config` configuration,
    /// e.g. the default provider chain.
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Result<Self, S3ClientError> {
        Self::from_sdk_config_with(sdk_config, &SdkOverrides::default())
    }

    /// Like [`S3Client::from_sdk_config`], with region, endpoint and addressing
    /// style taken from `overrides` where set.
    pub fn from_sdk_config_with(
        sdk_config: &SdkConfig,
        overrides: &SdkOverrides,
    ) -> Result<Self, S3ClientError> {
        let region = match overrides.region() {
            Some(region) => region.to_string(),
            None => sdk_config
                .region()
                .map(|region| region.as_ref().to_string())
                .unwrap_or_default(),
        };

        if region.is_empty() {
            return Err(configuration_failed(MISSING_REGION));
        }

        if sdk_config.credentials_provider().is_none() {
            return Err(configuration_failed(MISSING_CREDENTIALS));
        }

        let mut builder = Builder::from(sdk_config).region(Region::new(region.clone()));
        if sdk_config.behavior_version().is_none() {
            builder = builder.behavior_version(BehaviorVersion::latest());
        }

        if let Some(endpoint_url) = overrides.endpoint_url() {
            builder = builder.endpoint_url(endpoint_url);
        }

        if overrides.force_path_style {
            builder = builder.force_path_style(true);
        }

        info!(region = %region, "configured");

        Ok(Self {
            store: Box::new(aws_sdk_s3::Client::from_conf(builder.build())),
            region,
        })
    }

    pub fn with_store(store: impl ObjectStore + 'static, region: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    #[instrument(skip(self), fields(context = "get_presigned_url"))]
    pub async fn get_presigned_url(
        &self,
        params: &ObjectParams,
        options: Option<PresignOptions>,
    ) -> Result<String, S3ClientError> {
        info!("called");

        require_object(params, PRESIGN_FAILED, MISSING_OBJECT)?;
        let config = presigning_config(options, PRESIGN_FAILED)?;

        self.store
            .presign_get_object(params, config)
            .await
            .map_err(|err| request_failed(PRESIGN_FAILED, "presign_get_object", err))
    }

    #[instrument(skip(self), fields(context = "get_presigned_upload_url"))]
    pub async fn get_presigned_upload_url(
        &self,
        params: &ObjectParams,
        options: Option<PresignOptions>,
    ) -> Result<String, S3ClientError> {
        info!("called");

        require_object(params, PRESIGN_UPLOAD_FAILED, MISSING_OBJECT)?;
        let config = presigning_config(options, PRESIGN_UPLOAD_FAILED)?;

        self.store
            .presign_put_object(params, config)
            .await
            .map_err(|err| request_failed(PRESIGN_UPLOAD_FAILED, "presign_put_object", err))
    }

    #[instrument(skip(self), fields(context = "read_file"))]
    pub async fn read_file(
        &self,
        params: &ObjectParams,
        return_type: ReturnType,
    ) -> Result<FileContents, S3ClientError> {
        info!("called");

        require_object(params, READ_FAILED, MISSING_OBJECT)?;

        let output = self
            .store
            .get_object(params)
            .await
            .map_err(|err| request_failed(READ_FAILED, "get_object", err))?;

        match return_type {
            ReturnType::Stream => Ok(FileContents::Stream(output.body)),
            ReturnType::String => stream_to_string(body_stream(output.body))
                .await
                .map(FileContents::String)
                .map_err(|err| body_failed(READ_FAILED, err)),
            ReturnType::Buffer => stream_to_buffer(body_stream(output.body))
                .await
                .map(FileContents::Buffer)
                .map_err(|err| body_failed(READ_FAILED, err)),
        }
    }

    #[instrument(skip(self, file), fields(context = "upload_file"))]
    pub async fn upload_file(
        &self,
        file: impl Into<Bytes>,
        params: &ObjectParams,
    ) -> Result<PutObjectOutput, S3ClientError> {
        info!("called");

        require_object(params, UPLOAD_FAILED, MISSING_DESTINATION)?;

        let file: Bytes = file.into();
        info!(size = file.len(), "uploading");

        self.store
            .put_object(params, ByteStream::from(file))
            .await
            .map_err(|err| request_failed(UPLOAD_FAILED, "put_object", err))
    }

    #[instrument(skip(self), fields(context = "delete_file"))]
    pub async fn delete_file(
        &self,
        params: &ObjectParams,
    ) -> Result<DeleteObjectOutput, S3ClientError> {
        info!("called");

        require_object(params, DELETE_FAILED, MISSING_OBJECT)?;

        self.store
            .delete_object(params)
            .await
            .map_err(|err| request_failed(DELETE_FAILED, "delete_object", err))
    }

    #[instrument(skip(self), fields(context = "file_exists"))]
    pub async fn file_exists(&self, params: &ObjectParams) -> Result<bool, S3ClientError> {
        info!("called");

        require_object(params, EXISTS_FAILED, MISSING_OBJECT)?;

        match self.store.head_object(params).await {
            Ok(_) => Ok(true),
            Err(err) => {
                if let Some(svc_err) = err.as_service_error() {
                    if svc_err.is_not_found() {
                        return Ok(false);
                    }
                }

                Err(request_failed(EXISTS_FAILED, "head_object", err))
            }
        }
    }

    /// Lists every object under `prefix`, following continuation tokens
    /// until the listing is exhausted.
    #[instrument(skip(self), fields(context = "list_files"))]
    pub async fn list_files(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>, S3ClientError> {
        info!("called");

        require_bucket(bucket, LIST_FAILED, MISSING_BUCKET)?;

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let lo = self
                .store
                .list_objects_v2(bucket, prefix, continuation_token)
                .await
                .map_err(|err| request_failed(LIST_FAILED, "list_objects", err))?;

            for o in lo.contents() {
                objects.push(ObjectSummary {
                    key: o.key().unwrap_or("").to_string(),
                    size: o.size().unwrap_or(0),
                    last_modified: to_system_time(o.last_modified()),
                    e_tag: o.e_tag().map(String::from),
                });
            }

            continuation_token = lo.next_continuation_token().map(String::from);
            if continuation_token.is_none() {
                break;
            }
        }

        info!(count = objects.len(), "listed");

        Ok(objects)
    }

    #[instrument(skip(self), fields(context = "create_bucket"))]
    pub async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketOutput, S3ClientError> {
        info!("called");

        require_bucket(bucket, CREATE_BUCKET_FAILED, MISSING_BUCKET_NAME)?;

        let location = if self.region == DEFAULT_REGION {
            None
        } else {
            Some(self.region.as_str())
        };

        self.store
            .create_bucket(bucket, location)
            .await
            .map_err(|err| request_failed(CREATE_BUCKET_FAILED, "create_bucket", err))
    }

    #[instrument(skip(self), fields(context = "delete_bucket"))]
    pub async fn delete_bucket(&self, bucket: &str) -> Result<DeleteBucketOutput, S3ClientError> {
        info!("called");

        require_bucket(bucket, DELETE_BUCKET_FAILED, MISSING_BUCKET_NAME)?;

        self.store
            .delete_bucket(bucket)
            .await
            .map_err(|err| request_failed(DELETE_BUCKET_FAILED, "delete_bucket", err))
    }

    #[instrument(skip(self), fields(context = "bucket_exists"))]
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool, S3ClientError> {
        info!("called");

        require_bucket(bucket, BUCKET_EXISTS_FAILED, MISSING_BUCKET_NAME)?;

        match self.store.head_bucket(bucket).await {
            Ok(_) => Ok(true),
            Err(err) => {
                if let Some(svc_err) = err.as_service_error() {
                    if svc_err.is_not_found() {
                        return Ok(false);
                    }
                }

                Err(request_failed(BUCKET_EXISTS_FAILED, "head_bucket", err))
            }
        }
    }
}

fn configuration_failed(reason: &str) -> S3ClientError {
    error!(error_message = reason, error_group = "configuration");
    S3ClientError::configuration(reason)
}

fn require_object(params: &ObjectParams, message: &str, reason: &str) -> Result<(), S3ClientError> {
    if params.is_addressable() {
        return Ok(());
    }

    error!(error_message = reason, error_group = "invalid_params");
    Err(S3ClientError::invalid_params(message, reason))
}

fn require_bucket(bucket: &str, message: &str, reason: &str) -> Result<(), S3ClientError> {
    if !bucket.is_empty() {
        return Ok(());
    }

    error!(error_message = reason, error_group = "invalid_params");
    Err(S3ClientError::invalid_params(message, reason))
}

fn presigning_config(
    options: Option<PresignOptions>,
    message: &str,
) -> Result<PresigningConfig, S3ClientError> {
    let options = options.unwrap_or_default();

    PresigningConfig::expires_in(options.expires_in).map_err(|err| {
        error!(error_message = %err, error_group = "invalid_params");
        S3ClientError::new(ErrorKind::InvalidParams, message).with_cause(err)
    })
}

fn request_failed<E>(message: &str, group: &'static str, err: SdkError<E>) -> S3ClientError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let err = S3ClientError::request(message, err);
    error!(error_message = %err.detailed(), error_group = group);
    err
}

fn body_failed<E>(message: &str, err: E) -> S3ClientError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let err = S3ClientError::body(message, err);
    error!(error_message = %err.detailed(), error_group = "collect_body");
    err
}

fn to_system_time(dt: Option<&DateTime>) -> SystemTime {
    dt.and_then(|dt| SystemTime::try_from(*dt).ok())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use std::{error::Error, time::Duration};

    use aws_sdk_s3::config::SharedCredentialsProvider;

    use super::*;
    use crate::{adapters::mock::MockS3Client, model::config::Credentials as StaticCredentials};

    fn mock_client(mock: &MockS3Client) -> S3Client {
        S3Client::with_store(mock.clone(), "us-east-1")
    }

    fn cause_of(err: &S3ClientError) -> String {
        err.source().map(|s| s.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_new_validates_config() {
        let cases = vec![
            (
                ClientConfig {
                    region: None,
                    credentials: StaticCredentials::new("id", "secret"),
                    ..Default::default()
                },
                MISSING_REGION,
            ),
            (
                ClientConfig::new("", StaticCredentials::new("id", "secret")),
                MISSING_REGION,
            ),
            (
                ClientConfig::new("us-east-1", StaticCredentials::new("", "secret")),
                MISSING_CREDENTIALS,
            ),
            (
                ClientConfig::new("us-east-1", StaticCredentials::new("id", "")),
                MISSING_CREDENTIALS,
            ),
            (
                ClientConfig {
                    region: None,
                    credentials: StaticCredentials::default(),
                    ..Default::default()
                },
                MISSING_REGION,
            ),
        ];

        for (config, expected) in cases {
            let err = match S3Client::new(config.clone()) {
                Ok(_) => panic!("expected error for case: {:?}", config),
                Err(err) => err,
            };

            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert_eq!(err.message(), "The S3 client couldn't be configured properly");
            assert_eq!(cause_of(&err), expected, "failed for case: {:?}", config);
        }
    }

    #[test]
    fn test_new_builds_client() {
        let mut config = ClientConfig::new("eu-west-1", StaticCredentials::new("id", "secret"));
        config.endpoint_url = Some("http://localhost:9000".to_string());
        config.force_path_style = true;

        let client = S3Client::new(config).unwrap();
        assert_eq!(client.region(), "eu-west-1");
    }

    #[test]
    fn test_from_sdk_config() {
        let no_region = SdkConfig::builder().build();
        let err = S3Client::from_sdk_config(&no_region).err().unwrap();
        assert_eq!(cause_of(&err), MISSING_REGION);

        let no_credentials = SdkConfig::builder()
            .region(Region::new("us-west-2"))
            .build();
        let err = S3Client::from_sdk_config(&no_credentials).err().unwrap();
        assert_eq!(cause_of(&err), MISSING_CREDENTIALS);

        let complete = SdkConfig::builder()
            .region(Region::new("us-west-2"))
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "id", "secret", None, None, "test",
            )))
            .build();
        let client = S3Client::from_sdk_config(&complete).unwrap();
        assert_eq!(client.region(), "us-west-2");
    }

    #[tokio::test]
    async fn test_from_sdk_config_with_overrides() {
        let no_region = SdkConfig::builder()
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "AKIDEXAMPLE",
                "secret",
                None,
                None,
                "test",
            )))
            .build();

        let err = S3Client::from_sdk_config_with(&no_region, &SdkOverrides::default())
            .err()
            .unwrap();
        assert_eq!(cause_of(&err), MISSING_REGION);

        let overrides = SdkOverrides {
            region: Some("eu-west-1".to_string()),
            endpoint_url: Some("http://localhost:9000".to_string()),
            force_path_style: true,
        };
        let client = S3Client::from_sdk_config_with(&no_region, &overrides).unwrap();
        assert_eq!(client.region(), "eu-west-1");

        let url = client
            .get_presigned_url(&ObjectParams::new("demo-bucket", "demo-key"), None)
            .await
            .unwrap();
        assert!(
            url.starts_with("http://localhost:9000/demo-bucket/demo-key"),
            "unexpected url: {}",
            url
        );
        assert!(url.contains("eu-west-1"), "unexpected url: {}", url);
    }

    #[test]
    fn test_override_region_wins() {
        let sdk_config = SdkConfig::builder()
            .region(Region::new("us-west-2"))
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "id", "secret", None, None, "test",
            )))
            .build();

        let cases = vec![
            (None, "us-west-2"),
            (Some(""), "us-west-2"),
            (Some("ap-south-1"), "ap-south-1"),
        ];

        for (region, expected) in cases {
            let overrides = SdkOverrides {
                region: region.map(String::from),
                ..Default::default()
            };
            let client = S3Client::from_sdk_config_with(&sdk_config, &overrides).unwrap();
            assert_eq!(client.region(), expected, "failed for case: {:?}", region);
        }
    }

    #[tokio::test]
    async fn test_missing_object_params() {
        let mock = MockS3Client::new().with_object("bucket", "key", "body");
        let client = mock_client(&mock);

        let cases = vec![
            ObjectParams::new("", "key"),
            ObjectParams::new("bucket", ""),
            ObjectParams::default(),
        ];

        for params in cases {
            let results = vec![
                (
                    client.get_presigned_url(&params, None).await.err(),
                    PRESIGN_FAILED,
                    MISSING_OBJECT,
                ),
                (
                    client.get_presigned_upload_url(&params, None).await.err(),
                    PRESIGN_UPLOAD_FAILED,
                    MISSING_OBJECT,
                ),
                (
                    client.read_file(&params, ReturnType::Stream).await.err(),
                    READ_FAILED,
                    MISSING_OBJECT,
                ),
                (
                    client.upload_file(b"data".to_vec(), &params).await.err(),
                    UPLOAD_FAILED,
                    MISSING_DESTINATION,
                ),
                (
                    client.delete_file(&params).await.err(),
                    DELETE_FAILED,
                    MISSING_OBJECT,
                ),
                (
                    client.file_exists(&params).await.err(),
                    EXISTS_FAILED,
                    MISSING_OBJECT,
                ),
            ];

            for (err, message, reason) in results {
                let err = err.unwrap_or_else(|| panic!("expected error for case: {:?}", params));
                assert_eq!(err.kind(), ErrorKind::InvalidParams);
                assert_eq!(err.message(), message, "failed for case: {:?}", params);
                assert_eq!(cause_of(&err), reason, "failed for case: {:?}", params);
            }
        }

        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_bucket_name() {
        let mock = MockS3Client::new();
        let client = mock_client(&mock);

        let results = vec![
            (client.list_files("", "").await.err(), LIST_FAILED, MISSING_BUCKET),
            (
                client.create_bucket("").await.err(),
                CREATE_BUCKET_FAILED,
                MISSING_BUCKET_NAME,
            ),
            (
                client.delete_bucket("").await.err(),
                DELETE_BUCKET_FAILED,
                MISSING_BUCKET_NAME,
            ),
            (
                client.bucket_exists("").await.err(),
                BUCKET_EXISTS_FAILED,
                MISSING_BUCKET_NAME,
            ),
        ];

        for (err, message, reason) in results {
            let err = err.expect("expected error");
            assert_eq!(err.kind(), ErrorKind::InvalidParams);
            assert_eq!(err.message(), message);
            assert_eq!(cause_of(&err), reason);
        }

        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_then_read() {
        let mock = MockS3Client::new().with_bucket("bucket");
        let client = mock_client(&mock);
        let params = ObjectParams::new("bucket", "folder/file.txt");

        client
            .upload_file(Bytes::from_static(b"hello world"), &params)
            .await
            .unwrap();
        assert_eq!(
            mock.object("bucket", "folder/file.txt"),
            Some(Bytes::from_static(b"hello world"))
        );

        let contents = client.read_file(&params, ReturnType::String).await.unwrap();
        assert_eq!(contents.into_string().as_deref(), Some("hello world"));

        let contents = client.read_file(&params, ReturnType::Buffer).await.unwrap();
        assert_eq!(
            contents.into_buffer(),
            Some(Bytes::from_static(b"hello world"))
        );

        let stream = client
            .read_file(&params, ReturnType::default())
            .await
            .unwrap()
            .into_stream()
            .unwrap();
        let collected = stream.collect().await.unwrap().into_bytes();
        assert_eq!(&collected[..], b"hello world");

        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn test_read_failing_body() {
        let mock = MockS3Client::new().with_failing_body("bucket", "broken");
        let client = mock_client(&mock);
        let params = ObjectParams::new("bucket", "broken");

        for return_type in [ReturnType::String, ReturnType::Buffer] {
            let err = client.read_file(&params, return_type).await.unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Body, "failed for case: {:?}", return_type);
            assert_eq!(err.message(), READ_FAILED, "failed for case: {:?}", return_type);
            assert!(err.source().is_some(), "failed for case: {:?}", return_type);
        }

        let contents = client.read_file(&params, ReturnType::Stream).await.unwrap();
        let mut stream = contents.into_stream().unwrap();
        assert!(matches!(stream.next().await, Some(Err(_))));
    }

    #[tokio::test]
    async fn test_read_missing_key() {
        let mock = MockS3Client::new().with_bucket("bucket");
        let client = mock_client(&mock);

        let err = client
            .read_file(&ObjectParams::new("bucket", "nope"), ReturnType::String)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.message(), READ_FAILED);
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_upload_to_missing_bucket() {
        let mock = MockS3Client::new();
        let client = mock_client(&mock);

        let err = client
            .upload_file("data", &ObjectParams::new("missing", "key"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.message(), UPLOAD_FAILED);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_file() {
        let mock = MockS3Client::new().with_object("bucket", "key", "body");
        let client = mock_client(&mock);
        let params = ObjectParams::new("bucket", "key").with_version("v1");

        let output = client.delete_file(&params).await.unwrap();

        assert_eq!(output.version_id(), Some("v1"));
        assert_eq!(mock.object("bucket", "key"), None);
    }

    #[tokio::test]
    async fn test_file_exists() {
        let mock = MockS3Client::new().with_object("bucket", "key", "body");
        let client = mock_client(&mock);

        let cases = vec![
            (ObjectParams::new("bucket", "key"), true),
            (ObjectParams::new("bucket", "other"), false),
            (ObjectParams::new("elsewhere", "key"), false),
        ];

        for (params, expected) in cases {
            let result = client.file_exists(&params).await.unwrap();
            assert_eq!(result, expected, "failed for case: {:?}", params);
        }
    }

    #[tokio::test]
    async fn test_list_files_follows_pages() {
        let mut mock = MockS3Client::new().with_page_size(2);
        for key in ["a/1", "a/2", "a/3", "a/4", "a/5", "b/1"] {
            mock = mock.with_object("bucket", key, key.to_string());
        }
        let client = mock_client(&mock);

        let cases = vec![
            ("a/", vec!["a/1", "a/2", "a/3", "a/4", "a/5"], 3),
            ("b/", vec!["b/1"], 1),
            ("", vec!["a/1", "a/2", "a/3", "a/4", "a/5", "b/1"], 3),
            ("c/", vec![], 1),
        ];

        for (prefix, expected, pages) in cases {
            let before = mock.request_count();
            let objects = client.list_files("bucket", prefix).await.unwrap();
            let keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();

            assert_eq!(keys, expected, "failed on keys for prefix: {}", prefix);
            assert_eq!(
                mock.request_count() - before,
                pages,
                "failed on page count for prefix: {}",
                prefix
            );
        }

        let objects = client.list_files("bucket", "b/").await.unwrap();
        assert_eq!(objects[0].size, 3);
        assert_eq!(objects[0].last_modified, SystemTime::UNIX_EPOCH);
        assert_eq!(objects[0].e_tag.as_deref(), Some("\"mock\""));
    }

    #[tokio::test]
    async fn test_list_missing_bucket() {
        let mock = MockS3Client::new();
        let client = mock_client(&mock);

        let err = client.list_files("missing", "").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.message(), LIST_FAILED);
    }

    #[tokio::test]
    async fn test_bucket_lifecycle() {
        let mock = MockS3Client::new();
        let client = mock_client(&mock);

        assert!(!client.bucket_exists("bucket").await.unwrap());

        let output = client.create_bucket("bucket").await.unwrap();
        assert_eq!(output.location(), Some("/bucket"));
        assert!(client.bucket_exists("bucket").await.unwrap());

        let err = client.create_bucket("bucket").await.unwrap_err();
        assert_eq!(err.message(), CREATE_BUCKET_FAILED);

        client.delete_bucket("bucket").await.unwrap();
        assert!(!mock.has_bucket("bucket"));

        let err = client.delete_bucket("bucket").await.unwrap_err();
        assert_eq!(err.message(), DELETE_BUCKET_FAILED);
    }

    #[tokio::test]
    async fn test_create_bucket_location_constraint() {
        let mock = MockS3Client::new();
        let client = S3Client::with_store(mock.clone(), "eu-west-1");

        let output = client.create_bucket("bucket").await.unwrap();

        assert_eq!(
            output.location(),
            Some("http://bucket.s3.eu-west-1.mock.local/")
        );
    }

    #[tokio::test]
    async fn test_presigned_urls() {
        let mock = MockS3Client::new();
        let client = mock_client(&mock);
        let params = ObjectParams::new("bucket", "key").with_version("v2");

        let url = client.get_presigned_url(&params, None).await.unwrap();
        assert_eq!(
            url,
            "https://bucket.s3.mock.local/key?X-Amz-Method=GET&X-Amz-Expires=900&versionId=v2"
        );

        let url = client
            .get_presigned_upload_url(
                &ObjectParams::new("bucket", "key"),
                Some(PresignOptions::expires_in(Duration::from_secs(60))),
            )
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://bucket.s3.mock.local/key?X-Amz-Method=PUT&X-Amz-Expires=60"
        );
    }

    #[tokio::test]
    async fn test_presign_rejects_long_expiry() {
        let mock = MockS3Client::new();
        let client = mock_client(&mock);

        let err = client
            .get_presigned_url(
                &ObjectParams::new("bucket", "key"),
                Some(PresignOptions::expires_in(Duration::from_secs(
                    8 * 24 * 60 * 60,
                ))),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParams);
        assert_eq!(err.message(), PRESIGN_FAILED);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_presign_with_sdk_client() {
        let client = S3Client::new(ClientConfig::new(
            "us-east-1",
            StaticCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        ))
        .unwrap();

        let url = client
            .get_presigned_url(
                &ObjectParams::new("demo-bucket", "demo-key").with_version("v1"),
                Some(PresignOptions::expires_in(Duration::from_secs(60))),
            )
            .await
            .unwrap();

        assert!(url.contains("demo-bucket"), "unexpected url: {}", url);
        assert!(url.contains("demo-key"), "unexpected url: {}", url);
        assert!(url.contains("versionId=v1"), "unexpected url: {}", url);
        assert!(url.contains("x-id=GetObject"), "unexpected url: {}", url);
        assert!(url.contains("X-Amz-Expires=60"), "unexpected url: {}", url);
        assert!(url.contains("X-Amz-Signature="), "unexpected url: {}", url);

        let url = client
            .get_presigned_upload_url(&ObjectParams::new("demo-bucket", "upload-key"), None)
            .await
            .unwrap();

        assert!(url.contains("upload-key"), "unexpected url: {}", url);
        assert!(url.contains("x-id=PutObject"), "unexpected url: {}", url);
        assert!(url.contains("X-Amz-Expires=900"), "unexpected url: {}", url);
        assert!(url.contains("X-Amz-Signature="), "unexpected url: {}", url);
        assert!(!url.contains("versionId"), "unexpected url: {}", url);
    }

    #[test]
    fn test_to_system_time() {
        let cases = vec![
            (None, SystemTime::UNIX_EPOCH),
            (Some(DateTime::from_secs(0)), SystemTime::UNIX_EPOCH),
            (
                Some(DateTime::from_secs(1_700_000_000)),
                SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(to_system_time(input.as_ref()), expected);
        }
    }
}
