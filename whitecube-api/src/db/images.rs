//! Exhibition image repository facade
//!
//! Fetch, create, update, delete, reorder, bulk-copy and poster promotion for
//! exhibition images. Promotion runs inside one transaction (demote first,
//! then promote) and is backstopped by the partial unique poster index, so an
//! exhibition can never hold two posters.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;
use whitecube_common::models::ExhibitionImage;
use whitecube_common::{Bucket, Error, ImageType, Result};

use super::parse_uuid;
use crate::storage::ObjectStore;

/// Sort order for image listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSort {
    /// `display_order` ascending, creation time as tie-break.
    DisplayOrder,
    /// Newest first.
    #[default]
    CreatedAt,
    /// Type, then `display_order` within each type.
    TypeThenOrder,
}

/// Listing parameters (filter, sort, pagination).
#[derive(Debug, Clone, Default)]
pub struct ImageQuery {
    pub image_type: Option<ImageType>,
    pub sort_by: ImageSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Fields for a new image record.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub exhibition_id: Uuid,
    pub image_url: String,
    pub storage_path: Option<String>,
    pub alt_text: Option<String>,
    pub display_order: i64,
    pub image_type: ImageType,
}

/// Partial metadata update; absent fields are left unchanged.
///
/// `alt_text` distinguishes "absent" from "null": an explicit JSON `null`
/// clears the stored value.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ImageUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub alt_text: Option<Option<String>>,
    pub display_order: Option<i64>,
    pub image_type: Option<ImageType>,
}

fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

const IMAGE_COLUMNS: &str =
    "id, exhibition_id, image_url, storage_path, alt_text, display_order, image_type, created_at";

fn image_from_row(row: &SqliteRow) -> Result<ExhibitionImage> {
    let id: String = row.get("id");
    let exhibition_id: String = row.get("exhibition_id");
    let image_type: String = row.get("image_type");

    Ok(ExhibitionImage {
        id: parse_uuid(&id, "exhibition_images.id")?,
        exhibition_id: parse_uuid(&exhibition_id, "exhibition_images.exhibition_id")?,
        image_url: row.get("image_url"),
        storage_path: row.get("storage_path"),
        alt_text: row.get("alt_text"),
        display_order: row.get("display_order"),
        image_type: ImageType::from_str(&image_type)?,
        created_at: row.get("created_at"),
    })
}

/// List images for one exhibition with optional type filter, sort and
/// offset/limit pagination.
pub async fn list_for_exhibition(
    pool: &SqlitePool,
    exhibition_id: Uuid,
    query: &ImageQuery,
) -> Result<Vec<ExhibitionImage>> {
    let mut sql = format!(
        "SELECT {} FROM exhibition_images WHERE exhibition_id = ?",
        IMAGE_COLUMNS
    );
    if query.image_type.is_some() {
        sql.push_str(" AND image_type = ?");
    }
    sql.push_str(match query.sort_by {
        ImageSort::DisplayOrder => " ORDER BY display_order ASC, created_at ASC",
        ImageSort::CreatedAt => " ORDER BY created_at DESC",
        ImageSort::TypeThenOrder => " ORDER BY image_type ASC, display_order ASC",
    });
    sql.push_str(" LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql).bind(exhibition_id.to_string());
    if let Some(ty) = query.image_type {
        q = q.bind(ty.as_str());
    }
    // SQLite treats a negative LIMIT as "no limit"
    q = q
        .bind(query.limit.unwrap_or(-1))
        .bind(query.offset.unwrap_or(0));

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(image_from_row).collect()
}

/// Load one image by id.
pub async fn get_image(pool: &SqlitePool, id: Uuid) -> Result<ExhibitionImage> {
    let sql = format!(
        "SELECT {} FROM exhibition_images WHERE id = ?",
        IMAGE_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("image {}", id)))?;

    image_from_row(&row)
}

/// Insert a new image record.
pub async fn create_image(pool: &SqlitePool, new: NewImage) -> Result<ExhibitionImage> {
    let id = Uuid::new_v4();
    let created_at = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO exhibition_images (
            id, exhibition_id, image_url, storage_path, alt_text,
            display_order, image_type, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(new.exhibition_id.to_string())
    .bind(&new.image_url)
    .bind(&new.storage_path)
    .bind(&new.alt_text)
    .bind(new.display_order)
    .bind(new.image_type.as_str())
    .bind(created_at)
    .execute(pool)
    .await?;

    get_image(pool, id).await
}

/// Update image metadata (alt text, display order, type). Absent fields keep
/// their current value; an explicit null clears the alt text.
///
/// Changing the type to `poster` goes through the same single-poster rule as
/// promotion: it conflicts while another poster exists.
pub async fn update_image(
    pool: &SqlitePool,
    id: Uuid,
    update: ImageUpdate,
) -> Result<ExhibitionImage> {
    let current = get_image(pool, id).await?;

    let alt_text = match update.alt_text {
        Some(value) => value,
        None => current.alt_text,
    };
    let display_order = update.display_order.unwrap_or(current.display_order);
    let image_type = update.image_type.unwrap_or(current.image_type);

    if image_type == ImageType::Poster && current.image_type != ImageType::Poster {
        if let Some(existing) = poster_image(pool, current.exhibition_id).await? {
            if existing.id != id {
                return Err(Error::Conflict(format!(
                    "exhibition {} already has a poster; promote instead",
                    current.exhibition_id
                )));
            }
        }
    }

    sqlx::query(
        "UPDATE exhibition_images SET alt_text = ?, display_order = ?, image_type = ? WHERE id = ?",
    )
    .bind(&alt_text)
    .bind(display_order)
    .bind(image_type.as_str())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get_image(pool, id).await
}

/// Delete an image record only.
pub async fn delete_image(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM exhibition_images WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("image {}", id)));
    }
    Ok(())
}

/// Delete an image record and, best-effort, its backing stored object.
///
/// The object is only removed when this record holds the last reference to
/// its storage path (bulk-copied records share one object). A storage
/// deletion failure is logged and swallowed; the record is deleted either
/// way.
pub async fn delete_image_with_storage(
    pool: &SqlitePool,
    store: &dyn ObjectStore,
    id: Uuid,
) -> Result<()> {
    let image = get_image(pool, id).await?;

    if let Some(path) = &image.storage_path {
        let (references,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM exhibition_images WHERE storage_path = ?")
                .bind(path)
                .fetch_one(pool)
                .await?;

        if references <= 1 {
            if let Err(e) = store
                .delete_objects(Bucket::Exhibitions, &[path.clone()])
                .await
            {
                warn!("Storage deletion failed for {}: {}", path, e);
            }
        }
    }

    delete_image(pool, id).await
}

/// Reassign display orders within one exhibition. `ids` and `orders` are
/// parallel lists; all updates run in one transaction. An id outside the
/// exhibition is `NotFound` and rolls the whole batch back.
pub async fn reorder_images(
    pool: &SqlitePool,
    exhibition_id: Uuid,
    ids: &[Uuid],
    orders: &[i64],
) -> Result<()> {
    if ids.len() != orders.len() {
        return Err(Error::InvalidInput(format!(
            "reorder lists differ in length: {} ids, {} orders",
            ids.len(),
            orders.len()
        )));
    }

    let mut tx = pool.begin().await?;
    for (id, order) in ids.iter().zip(orders) {
        let result = sqlx::query(
            "UPDATE exhibition_images SET display_order = ? WHERE id = ? AND exhibition_id = ?",
        )
        .bind(order)
        .bind(id.to_string())
        .bind(exhibition_id.to_string())
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "image {} in exhibition {}",
                id, exhibition_id
            )));
        }
    }
    tx.commit().await?;
    Ok(())
}

/// The exhibition's poster image, if one exists.
pub async fn poster_image(
    pool: &SqlitePool,
    exhibition_id: Uuid,
) -> Result<Option<ExhibitionImage>> {
    let sql = format!(
        "SELECT {} FROM exhibition_images WHERE exhibition_id = ? AND image_type = 'poster'",
        IMAGE_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(exhibition_id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(image_from_row).transpose()
}

/// Designate one image as the exhibition's poster.
///
/// Demotes any current poster to `artwork` and promotes the target with
/// `display_order = 0`, all in one transaction. The target must belong to the
/// exhibition.
pub async fn set_poster_image(
    pool: &SqlitePool,
    exhibition_id: Uuid,
    image_id: Uuid,
) -> Result<ExhibitionImage> {
    let target = get_image(pool, image_id).await?;
    if target.exhibition_id != exhibition_id {
        return Err(Error::NotFound(format!(
            "image {} does not belong to exhibition {}",
            image_id, exhibition_id
        )));
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE exhibition_images SET image_type = 'artwork'
         WHERE exhibition_id = ? AND image_type = 'poster' AND id != ?",
    )
    .bind(exhibition_id.to_string())
    .bind(image_id.to_string())
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE exhibition_images SET image_type = 'poster', display_order = 0 WHERE id = ?",
    )
    .bind(image_id.to_string())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_image(pool, image_id).await
}

/// Copy images from one exhibition to another as new, independent records
/// sharing the same URL, alt text, order and type. Optionally restricted to a
/// set of types.
pub async fn copy_images(
    pool: &SqlitePool,
    from_exhibition: Uuid,
    to_exhibition: Uuid,
    image_types: Option<&[ImageType]>,
) -> Result<Vec<ExhibitionImage>> {
    let source = list_for_exhibition(
        pool,
        from_exhibition,
        &ImageQuery {
            sort_by: ImageSort::TypeThenOrder,
            ..ImageQuery::default()
        },
    )
    .await?;

    let mut copies = Vec::new();
    for image in source {
        if let Some(types) = image_types {
            if !types.contains(&image.image_type) {
                continue;
            }
        }

        if image.image_type == ImageType::Poster
            && poster_image(pool, to_exhibition).await?.is_some()
        {
            return Err(Error::Conflict(format!(
                "exhibition {} already has a poster",
                to_exhibition
            )));
        }

        let copy = create_image(
            pool,
            NewImage {
                exhibition_id: to_exhibition,
                image_url: image.image_url.clone(),
                storage_path: image.storage_path.clone(),
                alt_text: image.alt_text.clone(),
                display_order: image.display_order,
                image_type: image.image_type,
            },
        )
        .await?;
        copies.push(copy);
    }

    Ok(copies)
}

/// Delete several images independently. Every id is attempted; if any fail,
/// the successes are kept (no rollback) and an aggregate error names the
/// failed ids.
pub async fn bulk_delete(
    pool: &SqlitePool,
    store: &dyn ObjectStore,
    ids: &[Uuid],
) -> Result<usize> {
    let mut failed = Vec::new();
    let mut deleted = 0;

    for id in ids {
        match delete_image_with_storage(pool, store, *id).await {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!("Bulk delete failed for image {}: {}", id, e);
                failed.push(id.to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(deleted)
    } else {
        Err(Error::Internal(format!(
            "bulk delete failed for {} of {} images: {}",
            failed.len(),
            ids.len(),
            failed.join(", ")
        )))
    }
}

/// Next free display order within a `(exhibition, type)` group.
pub async fn next_display_order(
    pool: &SqlitePool,
    exhibition_id: Uuid,
    image_type: ImageType,
) -> Result<i64> {
    let (next,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(MAX(display_order) + 1, 0) FROM exhibition_images
         WHERE exhibition_id = ? AND image_type = ?",
    )
    .bind(exhibition_id.to_string())
    .bind(image_type.as_str())
    .fetch_one(pool)
    .await?;

    Ok(next)
}
