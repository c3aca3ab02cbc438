//! S3-backed object storage

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;
use whitecube_common::config::StorageSettings;
use whitecube_common::{Bucket, Error, Result};

use super::ObjectStore;

/// S3 client wrapper scoped to the deployment's bucket prefix.
pub struct S3Store {
    client: Client,
    settings: StorageSettings,
    region: String,
}

impl S3Store {
    /// Load AWS configuration from the environment and construct the client.
    pub async fn new(settings: StorageSettings) -> Result<Self> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let region = config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| Error::Config("AWS region not configured".to_string()))?;
        let client = Client::new(&config);

        Ok(Self {
            client,
            settings,
            region,
        })
    }

    fn bucket_name(&self, bucket: Bucket) -> String {
        format!("{}-{}", self.settings.bucket_prefix, bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let bucket_name = self.bucket_name(bucket);
        debug!("Writing to bucket {} with key: {}", bucket_name, path);

        self.client
            .put_object()
            .bucket(&bucket_name)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("put {}/{}: {}", bucket_name, path, e)))?;

        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        let bucket_name = self.bucket_name(bucket);
        match &self.settings.public_url_base {
            Some(base) => format!("{}/{}/{}", base.trim_end_matches('/'), bucket_name, path),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                bucket_name, self.region, path
            ),
        }
    }

    async fn delete_objects(&self, bucket: Bucket, paths: &[String]) -> Result<()> {
        let bucket_name = self.bucket_name(bucket);

        for path in paths {
            debug!("Deleting {}/{}", bucket_name, path);
            self.client
                .delete_object()
                .bucket(&bucket_name)
                .key(path)
                .send()
                .await
                .map_err(|e| {
                    Error::Storage(format!("delete {}/{}: {}", bucket_name, path, e))
                })?;
        }

        Ok(())
    }

    async fn list_objects(&self, bucket: Bucket) -> Result<Vec<String>> {
        let bucket_name = self.bucket_name(bucket);
        let mut paths = Vec::new();

        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&bucket_name)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| Error::Storage(format!("list {}: {}", bucket_name, e)))?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    paths.push(key.to_string());
                }
            }
        }

        Ok(paths)
    }
}
