use std::{
    collections::{BTreeMap, BTreeSet},
    future,
    sync::{Arc, Mutex, MutexGuard},
};

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        create_bucket::{CreateBucketError, CreateBucketOutput},
        delete_bucket::{DeleteBucketError, DeleteBucketOutput},
        delete_object::{DeleteObjectError, DeleteObjectOutput},
        get_object::{GetObjectError, GetObjectOutput},
        head_bucket::{HeadBucketError, HeadBucketOutput},
        head_object::{HeadObjectError, HeadObjectOutput},
        list_objects_v2::{ListObjectsV2Error, ListObjectsV2Output},
        put_object::{PutObjectError, PutObjectOutput},
    },
    presigning::PresigningConfig,
    primitives::{ByteStream, DateTime},
    types::{
        error::{BucketAlreadyOwnedByYou, NoSuchBucket, NoSuchKey, NotFound},
        Object,
    },
};
use aws_smithy_runtime_api::http::{Response, StatusCode};
use aws_smithy_types::body::SdkBody;
use bytes::Bytes;

use crate::{
    adapters::{ObjectStore, S3Future},
    model::object::ObjectParams,
};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Default)]
struct MockState {
    buckets: BTreeMap<String, BTreeMap<String, Bytes>>,
    failing_bodies: BTreeSet<(String, String)>,
    requests: usize,
}

/// In-memory stand-in for S3, used in tests.
///
/// Every trait call counts as one request, including failed ones.
#[derive(Clone)]
pub struct MockS3Client {
    state: Arc<Mutex<MockState>>,
    page_size: usize,
}

impl Default for MockS3Client {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl MockS3Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.lock().buckets.entry(bucket.to_string()).or_default();
        self
    }

    pub fn with_object(self, bucket: &str, key: &str, body: impl Into<Bytes>) -> Self {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body.into());
        self
    }

    /// The object's body errors on the first read instead of yielding data.
    pub fn with_failing_body(self, bucket: &str, key: &str) -> Self {
        {
            let mut state = self.lock();
            state
                .buckets
                .entry(bucket.to_string())
                .or_default()
                .insert(key.to_string(), Bytes::new());
            state
                .failing_bodies
                .insert((bucket.to_string(), key.to_string()));
        }
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.lock()
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.lock().buckets.contains_key(bucket)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self) {
        self.lock().requests += 1;
    }

    fn begin(&self) -> MutexGuard<'_, MockState> {
        let mut state = self.lock();
        state.requests += 1;
        state
    }
}

fn service_error<E>(err: E, status: u16) -> SdkError<E> {
    match StatusCode::try_from(status) {
        Ok(status) => SdkError::service_error(err, Response::new(status, SdkBody::empty())),
        Err(invalid) => SdkError::construction_failure(invalid),
    }
}

fn missing_bucket<E>(bucket: &str) -> SdkError<E> {
    SdkError::construction_failure(format!("no such bucket: {}", bucket))
}

fn ready<T: Send + 'static, E: Send + 'static>(result: Result<T, SdkError<E>>) -> S3Future<T, E> {
    Box::pin(future::ready(result))
}

fn presigned_url(params: &ObjectParams, config: &PresigningConfig, method: &str) -> String {
    let mut url = format!(
        "https://{}.s3.mock.local/{}?X-Amz-Method={}&X-Amz-Expires={}",
        params.bucket,
        params.key,
        method,
        config.expires().as_secs()
    );

    if let Some(version) = params.version() {
        url.push_str(&format!("&versionId={}", version));
    }

    url
}

impl ObjectStore for MockS3Client {
    fn get_object(&self, params: &ObjectParams) -> S3Future<GetObjectOutput, GetObjectError> {
        let state = self.begin();

        let result = match state.buckets.get(&params.bucket) {
            None => Err(missing_bucket(&params.bucket)),
            Some(objects) => match objects.get(&params.key) {
                None => Err(service_error(
                    GetObjectError::NoSuchKey(NoSuchKey::builder().build()),
                    404,
                )),
                Some(body) => {
                    let failing = state
                        .failing_bodies
                        .contains(&(params.bucket.clone(), params.key.clone()));
                    let stream = if failing {
                        ByteStream::new(SdkBody::taken())
                    } else {
                        ByteStream::from(body.clone())
                    };

                    Ok(GetObjectOutput::builder()
                        .content_length(body.len() as i64)
                        .body(stream)
                        .build())
                }
            },
        };

        ready(result)
    }

    fn presign_get_object(
        &self,
        params: &ObjectParams,
        config: PresigningConfig,
    ) -> S3Future<String, GetObjectError> {
        self.record();
        ready(Ok(presigned_url(params, &config, "GET")))
    }

    fn presign_put_object(
        &self,
        params: &ObjectParams,
        config: PresigningConfig,
    ) -> S3Future<String, PutObjectError> {
        self.record();
        ready(Ok(presigned_url(params, &config, "PUT")))
    }

    fn put_object(
        &self,
        params: &ObjectParams,
        body: ByteStream,
    ) -> S3Future<PutObjectOutput, PutObjectError> {
        self.record();

        let state = Arc::clone(&self.state);
        let bucket = params.bucket.clone();
        let key = params.key.clone();

        Box::pin(async move {
            let data = match body.collect().await {
                Ok(data) => data.into_bytes(),
                Err(err) => return Err(SdkError::construction_failure(err)),
            };

            let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let objects = match state.buckets.get_mut(&bucket) {
                None => return Err(missing_bucket(&bucket)),
                Some(objects) => objects,
            };

            objects.insert(key, data);

            Ok::<_, SdkError<PutObjectError>>(PutObjectOutput::builder().e_tag("\"mock\"").build())
        })
    }

    fn delete_object(
        &self,
        params: &ObjectParams,
    ) -> S3Future<DeleteObjectOutput, DeleteObjectError> {
        let mut state = self.begin();

        let result = match state.buckets.get_mut(&params.bucket) {
            None => Err(missing_bucket(&params.bucket)),
            Some(objects) => {
                objects.remove(&params.key);
                Ok(DeleteObjectOutput::builder()
                    .set_version_id(params.version().map(String::from))
                    .build())
            }
        };

        ready(result)
    }

    fn head_object(&self, params: &ObjectParams) -> S3Future<HeadObjectOutput, HeadObjectError> {
        let state = self.begin();

        let result = match state
            .buckets
            .get(&params.bucket)
            .and_then(|objects| objects.get(&params.key))
        {
            None => Err(service_error(
                HeadObjectError::NotFound(NotFound::builder().build()),
                404,
            )),
            Some(body) => Ok(HeadObjectOutput::builder()
                .content_length(body.len() as i64)
                .build()),
        };

        ready(result)
    }

    fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> S3Future<ListObjectsV2Output, ListObjectsV2Error> {
        let state = self.begin();

        let objects = match state.buckets.get(bucket) {
            None => {
                return ready(Err(service_error(
                    ListObjectsV2Error::NoSuchBucket(NoSuchBucket::builder().build()),
                    404,
                )))
            }
            Some(objects) => objects,
        };

        let start = continuation_token
            .and_then(|tok| tok.parse::<usize>().ok())
            .unwrap_or(0);

        let matching: Vec<Object> = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .skip(start)
            .take(self.page_size + 1)
            .map(|(key, body)| {
                Object::builder()
                    .key(key)
                    .size(body.len() as i64)
                    .e_tag("\"mock\"")
                    .last_modified(DateTime::from_secs(0))
                    .build()
            })
            .collect();

        let truncated = matching.len() > self.page_size;
        let contents: Vec<Object> = matching.into_iter().take(self.page_size).collect();
        let next = if truncated {
            Some((start + self.page_size).to_string())
        } else {
            None
        };

        ready(Ok(ListObjectsV2Output::builder()
            .key_count(contents.len() as i32)
            .set_contents(Some(contents))
            .is_truncated(truncated)
            .set_next_continuation_token(next)
            .build()))
    }

    fn create_bucket(
        &self,
        bucket: &str,
        location: Option<&str>,
    ) -> S3Future<CreateBucketOutput, CreateBucketError> {
        let mut state = self.begin();

        if state.buckets.contains_key(bucket) {
            return ready(Err(service_error(
                CreateBucketError::BucketAlreadyOwnedByYou(
                    BucketAlreadyOwnedByYou::builder().build(),
                ),
                409,
            )));
        }

        state.buckets.insert(bucket.to_string(), BTreeMap::new());

        let location = match location {
            Some(region) => format!("http://{}.s3.{}.mock.local/", bucket, region),
            None => format!("/{}", bucket),
        };

        ready(Ok(CreateBucketOutput::builder().location(location).build()))
    }

    fn delete_bucket(&self, bucket: &str) -> S3Future<DeleteBucketOutput, DeleteBucketError> {
        let mut state = self.begin();

        let result = match state.buckets.get(bucket).map(|objects| objects.is_empty()) {
            None => Err(missing_bucket(bucket)),
            Some(false) => Err(SdkError::construction_failure(format!(
                "bucket not empty: {}",
                bucket
            ))),
            Some(true) => {
                state.buckets.remove(bucket);
                Ok(DeleteBucketOutput::builder().build())
            }
        };

        ready(result)
    }

    fn head_bucket(&self, bucket: &str) -> S3Future<HeadBucketOutput, HeadBucketError> {
        let state = self.begin();

        let result = if state.buckets.contains_key(bucket) {
            Ok(HeadBucketOutput::builder().build())
        } else {
            Err(service_error(
                HeadBucketError::NotFound(NotFound::builder().build()),
                404,
            ))
        };

        ready(result)
    }
}
