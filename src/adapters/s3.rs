use aws_sdk_s3::{
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
    types::{BucketLocationConstraint, CreateBucketConfiguration},
};

use crate::{
    adapters::{ObjectStore, S3Future},
    model::object::ObjectParams,
};

impl ObjectStore for aws_sdk_s3::Client {
    fn get_object(&self, params: &ObjectParams) -> S3Future<GetObjectOutput, GetObjectError> {
        Box::pin(
            self.get_object()
                .bucket(&params.bucket)
                .key(&params.key)
                .set_version_id(params.version().map(String::from))
                .send(),
        )
    }

    fn presign_get_object(
        &self,
        params: &ObjectParams,
        config: PresigningConfig,
    ) -> S3Future<String, GetObjectError> {
        let req = self
            .get_object()
            .bucket(&params.bucket)
            .key(&params.key)
            .set_version_id(params.version().map(String::from));

        Box::pin(async move {
            req.presigned(config)
                .await
                .map(|presigned| presigned.uri().to_string())
        })
    }

    fn presign_put_object(
        &self,
        params: &ObjectParams,
        config: PresigningConfig,
    ) -> S3Future<String, PutObjectError> {
        let req = self.put_object().bucket(&params.bucket).key(&params.key);

        Box::pin(async move {
            req.presigned(config)
                .await
                .map(|presigned| presigned.uri().to_string())
        })
    }

    fn put_object(
        &self,
        params: &ObjectParams,
        body: ByteStream,
    ) -> S3Future<PutObjectOutput, PutObjectError> {
        Box::pin(
            self.put_object()
                .bucket(&params.bucket)
                .key(&params.key)
                .body(body)
                .send(),
        )
    }

    fn delete_object(
        &self,
        params: &ObjectParams,
    ) -> S3Future<DeleteObjectOutput, DeleteObjectError> {
        Box::pin(
            self.delete_object()
                .bucket(&params.bucket)
                .key(&params.key)
                .set_version_id(params.version().map(String::from))
                .send(),
        )
    }

    fn head_object(&self, params: &ObjectParams) -> S3Future<HeadObjectOutput, HeadObjectError> {
        Box::pin(
            self.head_object()
                .bucket(&params.bucket)
                .key(&params.key)
                .set_version_id(params.version().map(String::from))
                .send(),
        )
    }

    fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> S3Future<ListObjectsV2Output, ListObjectsV2Error> {
        let mut req = self.list_objects_v2().bucket(bucket).prefix(prefix);

        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }

        Box::pin(req.send())
    }

    fn create_bucket(
        &self,
        bucket: &str,
        location: Option<&str>,
    ) -> S3Future<CreateBucketOutput, CreateBucketError> {
        let mut req = self.create_bucket().bucket(bucket);

        if let Some(location) = location {
            req = req.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location))
                    .build(),
            );
        }

        Box::pin(req.send())
    }

    fn delete_bucket(&self, bucket: &str) -> S3Future<DeleteBucketOutput, DeleteBucketError> {
        Box::pin(self.delete_bucket().bucket(bucket).send())
    }

    fn head_bucket(&self, bucket: &str) -> S3Future<HeadBucketOutput, HeadBucketError> {
        Box::pin(self.head_bucket().bucket(bucket).send())
    }
}
