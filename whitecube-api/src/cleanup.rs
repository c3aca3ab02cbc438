//! Orphaned object cleanup sweep
//!
//! Uploads whose follow-up database insert failed leave objects with no
//! record pointing at them. This manually-triggered sweep lists a bucket and
//! deletes every object whose path is not recorded in the database. Matching
//! is by exact path equality; records keep exact storage paths precisely so
//! this sweep can never under- or over-delete on a substring.

use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::info;
use whitecube_common::{Bucket, Error, Result};

use crate::storage::ObjectStore;

/// All storage paths recorded for a bucket.
async fn used_paths(pool: &SqlitePool, bucket: Bucket) -> Result<HashSet<String>> {
    let sql = match bucket {
        Bucket::Exhibitions => {
            "SELECT storage_path FROM exhibition_images WHERE storage_path IS NOT NULL"
        }
        Bucket::Artists => {
            "SELECT profile_image_path FROM artists WHERE profile_image_path IS NOT NULL"
        }
        Bucket::Artworks => "SELECT storage_path FROM artworks WHERE storage_path IS NOT NULL",
        Bucket::General => {
            // Nothing records paths into the general bucket; a sweep would
            // delete every object in it.
            return Err(Error::InvalidInput(
                "bucket 'general' has no path tracking and cannot be swept".to_string(),
            ));
        }
    };

    let rows: Vec<(String,)> = sqlx::query_as(sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(path,)| path).collect())
}

/// Delete unreferenced objects from one bucket. Returns how many were
/// removed.
pub async fn sweep_bucket(
    pool: &SqlitePool,
    store: &dyn ObjectStore,
    bucket: Bucket,
) -> Result<usize> {
    let used = used_paths(pool, bucket).await?;
    let listed = store.list_objects(bucket).await?;

    let orphans: Vec<String> = listed
        .into_iter()
        .filter(|path| !used.contains(path))
        .collect();

    if !orphans.is_empty() {
        store.delete_objects(bucket, &orphans).await?;
    }

    info!(
        "Cleanup sweep of bucket {} removed {} orphaned objects ({} referenced)",
        bucket,
        orphans.len(),
        used.len()
    );

    Ok(orphans.len())
}
