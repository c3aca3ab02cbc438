//! Object storage collaborator
//!
//! The service consumes storage as four operations: write bytes to a
//! `(bucket, path)` key, obtain a public URL for a key, delete objects by
//! path, and list a bucket (used only by the cleanup sweep). The trait seam
//! keeps handlers testable against the in-memory backend.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use whitecube_common::{Bucket, Result};

pub use memory::MemoryStore;
pub use s3::S3Store;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` to `{bucket}/{path}`. Overwrites are not expected;
    /// generated names make collisions astronomically unlikely.
    async fn put_object(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Stable, externally-resolvable address for a stored object.
    fn public_url(&self, bucket: Bucket, path: &str) -> String;

    /// Delete objects by exact path. Missing objects are not an error.
    async fn delete_objects(&self, bucket: Bucket, paths: &[String]) -> Result<()>;

    /// List all object paths in a bucket (cleanup sweep / health checks).
    async fn list_objects(&self, bucket: Bucket) -> Result<Vec<String>>;
}
