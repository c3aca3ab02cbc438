//! In-memory object storage backend
//!
//! Used by tests and local development (`--storage memory`). Behaves like the
//! S3 backend minus durability; public URLs use a `memory://` scheme.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use whitecube_common::{Bucket, Result};

use super::ObjectStore;

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(Bucket, String), StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects held in one bucket (test helper).
    pub fn object_count(&self, bucket: Bucket) -> usize {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| *b == bucket)
            .count()
    }

    /// Whether an exact path exists in a bucket (test helper).
    pub fn contains(&self, bucket: Bucket, path: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket, path.to_string()))
    }

    /// Size in bytes of a stored object (test helper).
    pub fn object_size(&self, bucket: Bucket, path: &str) -> Option<usize> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket, path.to_string()))
            .map(|o| o.bytes.len())
    }

    /// Content type recorded for a stored object (test helper).
    pub fn content_type(&self, bucket: Bucket, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket, path.to_string()))
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.objects.lock().unwrap().insert(
            (bucket, path.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("memory://{}/{}", bucket, path)
    }

    async fn delete_objects(&self, bucket: Bucket, paths: &[String]) -> Result<()> {
        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(&(bucket, path.clone()));
        }
        Ok(())
    }

    async fn list_objects(&self, bucket: Bucket) -> Result<Vec<String>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| *b == bucket)
            .map(|(_, path)| path.clone())
            .collect())
    }
}
