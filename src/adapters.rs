use std::{future::Future, pin::Pin};

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
    primitives::ByteStream,
};

use crate::model::object::ObjectParams;

pub mod mock;
pub mod s3;

pub type S3Future<T, E> = Pin<Box<dyn Future<Output = Result<T, SdkError<E>>> + Send>>;

/// The subset of S3 requests the client issues. Each method builds exactly one
/// request and returns the SDK's own future, so callers await a single
/// in-flight request at a time.
pub trait ObjectStore: Send + Sync {
    fn get_object(&self, params: &ObjectParams) -> S3Future<GetObjectOutput, GetObjectError>;

    /// Resolves to the presigned URL of a GET request.
    fn presign_get_object(
        &self,
        params: &ObjectParams,
        config: PresigningConfig,
    ) -> S3Future<String, GetObjectError>;

    /// Resolves to the presigned URL of a PUT request.
    fn presign_put_object(
        &self,
        params: &ObjectParams,
        config: PresigningConfig,
    ) -> S3Future<String, PutObjectError>;

    fn put_object(
        &self,
        params: &ObjectParams,
        body: ByteStream,
    ) -> S3Future<PutObjectOutput, PutObjectError>;

    fn delete_object(
        &self,
        params: &ObjectParams,
    ) -> S3Future<DeleteObjectOutput, DeleteObjectError>;

    fn head_object(&self, params: &ObjectParams) -> S3Future<HeadObjectOutput, HeadObjectError>;

    fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> S3Future<ListObjectsV2Output, ListObjectsV2Error>;

    fn create_bucket(
        &self,
        bucket: &str,
        location: Option<&str>,
    ) -> S3Future<CreateBucketOutput, CreateBucketError>;

    fn delete_bucket(&self, bucket: &str) -> S3Future<DeleteBucketOutput, DeleteBucketError>;

    fn head_bucket(&self, bucket: &str) -> S3Future<HeadBucketOutput, HeadBucketError>;
}
