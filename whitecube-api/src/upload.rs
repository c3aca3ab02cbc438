//! Upload pipeline
//!
//! Validates files locally, generates collision-resistant object keys, writes
//! to object storage and reports per-file outcomes in input order. Validation
//! failures never reach the network and never abort the rest of a batch. The
//! storage write and the subsequent database insert are two separate steps
//! with no compensation; orphaned objects are reclaimed by the cleanup sweep.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;
use whitecube_common::Bucket;

use crate::storage::ObjectStore;

/// Upload size ceiling: 50 MiB.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// MIME types accepted for upload.
pub const SUPPORTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// Local validation failure; terminal for the file, never for the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("file too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("unsupported content type: {0} (allowed: JPEG, PNG, WebP, GIF)")]
    UnsupportedType(String),
}

/// Decide admissibility before any network call. Pure over file metadata.
pub fn validate_image(size: u64, content_type: &str) -> Result<(), UploadError> {
    if size > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }

    if !SUPPORTED_IMAGE_TYPES.contains(&content_type) {
        return Err(UploadError::UnsupportedType(content_type.to_string()));
    }

    Ok(())
}

/// Produce a storage object key unlikely to collide while keeping a
/// human-recognizable base name and extension.
///
/// `{prefix_}{sanitized_base}_{timestamp_ms}_{token}.{ext}` with the extension
/// lowercased. A file without an extension gets no trailing dot.
pub fn generate_file_name(original_name: &str, prefix: Option<&str>) -> String {
    let (base, extension) = match original_name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext.to_lowercase())),
        _ => (original_name, None),
    };

    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let timestamp = Utc::now().timestamp_millis();
    let token = Uuid::new_v4().simple().to_string();
    let token = &token[..6];

    let stem = match prefix {
        Some(prefix) => format!("{}_{}_{}_{}", prefix, sanitized, timestamp, token),
        None => format!("{}_{}_{}", sanitized, timestamp, token),
    };

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// One in-memory file handed to the pipeline.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one file upload. Transient: drives the database insert, then
/// discarded.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadResult {
    pub success: bool,
    pub public_url: Option<String>,
    pub storage_path: Option<String>,
    pub error: Option<String>,
}

impl UploadResult {
    fn ok(public_url: String, storage_path: String) -> Self {
        Self {
            success: true,
            public_url: Some(public_url),
            storage_path: Some(storage_path),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            public_url: None,
            storage_path: None,
            error: Some(error),
        }
    }
}

/// Upload a batch of files sequentially.
///
/// Returns one result per input file, in input order. `on_progress` receives
/// `(completed, total)` after each file resolves, so completed counts are
/// monotonically non-decreasing.
pub async fn upload_files(
    store: &dyn ObjectStore,
    bucket: Bucket,
    folder: Option<&str>,
    prefix: Option<&str>,
    files: Vec<UploadFile>,
    mut on_progress: impl FnMut(usize, usize),
) -> Vec<UploadResult> {
    let total = files.len();
    let mut results = Vec::with_capacity(total);

    for (index, file) in files.into_iter().enumerate() {
        let result = upload_one(store, bucket, folder, prefix, file).await;
        results.push(result);
        on_progress(index + 1, total);
    }

    results
}

async fn upload_one(
    store: &dyn ObjectStore,
    bucket: Bucket,
    folder: Option<&str>,
    prefix: Option<&str>,
    file: UploadFile,
) -> UploadResult {
    if let Err(e) = validate_image(file.bytes.len() as u64, &file.content_type) {
        return UploadResult::failed(e.to_string());
    }

    let file_name = generate_file_name(&file.file_name, prefix);
    let storage_path = match folder {
        Some(folder) => format!("{}/{}", folder, file_name),
        None => file_name,
    };

    match store
        .put_object(bucket, &storage_path, file.bytes, &file.content_type)
        .await
    {
        Ok(()) => {
            let public_url = store.public_url(bucket, &storage_path);
            UploadResult::ok(public_url, storage_path)
        }
        Err(e) => {
            tracing::error!("Upload failed for {}: {}", storage_path, e);
            UploadResult::failed(e.to_string())
        }
    }
}
