//! Video database operations
//!
//! YouTube-hosted videos, optionally linked to an exhibition or artist.
//! `youtube_id` is unique; link columns detach (SET NULL) when their target
//! is deleted.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use whitecube_common::models::Video;
use whitecube_common::{Error, Result};

use super::parse_uuid;

/// Listing parameters for videos. Results are sorted newest first.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct VideoQuery {
    /// Substring match against title and description.
    pub query: Option<String>,
    pub category: Option<String>,
    pub related_exhibition_id: Option<Uuid>,
    pub related_artist_id: Option<Uuid>,
    pub is_visible: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub youtube_url: String,
    pub youtube_id: String,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub related_exhibition_id: Option<Uuid>,
    pub related_artist_id: Option<Uuid>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
    pub youtube_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub related_exhibition_id: Option<Uuid>,
    pub related_artist_id: Option<Uuid>,
    pub is_visible: Option<bool>,
}

const COLUMNS: &str = "id, title, description, youtube_url, youtube_id, thumbnail_url, category, related_exhibition_id, related_artist_id, is_visible, created_at, updated_at";

fn video_from_row(row: &SqliteRow) -> Result<Video> {
    let id: String = row.get("id");
    let exhibition_id: Option<String> = row.get("related_exhibition_id");
    let artist_id: Option<String> = row.get("related_artist_id");

    Ok(Video {
        id: parse_uuid(&id, "videos.id")?,
        title: row.get("title"),
        description: row.get("description"),
        youtube_url: row.get("youtube_url"),
        youtube_id: row.get("youtube_id"),
        thumbnail_url: row.get("thumbnail_url"),
        category: row.get("category"),
        related_exhibition_id: exhibition_id
            .as_deref()
            .map(|s| parse_uuid(s, "videos.related_exhibition_id"))
            .transpose()?,
        related_artist_id: artist_id
            .as_deref()
            .map(|s| parse_uuid(s, "videos.related_artist_id"))
            .transpose()?,
        is_visible: row.get("is_visible"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn list(pool: &SqlitePool, query: &VideoQuery) -> Result<Vec<Video>> {
    let mut sql = format!("SELECT {} FROM videos WHERE 1 = 1", COLUMNS);
    if query.query.is_some() {
        sql.push_str(" AND (title LIKE ? OR description LIKE ?)");
    }
    if query.category.is_some() {
        sql.push_str(" AND category = ?");
    }
    if query.related_exhibition_id.is_some() {
        sql.push_str(" AND related_exhibition_id = ?");
    }
    if query.related_artist_id.is_some() {
        sql.push_str(" AND related_artist_id = ?");
    }
    if query.is_visible.is_some() {
        sql.push_str(" AND is_visible = ?");
    }
    sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql);
    if let Some(text) = &query.query {
        let pattern = format!("%{}%", text);
        q = q.bind(pattern.clone()).bind(pattern);
    }
    if let Some(category) = &query.category {
        q = q.bind(category);
    }
    if let Some(exhibition_id) = query.related_exhibition_id {
        q = q.bind(exhibition_id.to_string());
    }
    if let Some(artist_id) = query.related_artist_id {
        q = q.bind(artist_id.to_string());
    }
    if let Some(visible) = query.is_visible {
        q = q.bind(visible);
    }
    q = q
        .bind(query.limit.unwrap_or(-1))
        .bind(query.offset.unwrap_or(0));

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(video_from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Video> {
    let sql = format!("SELECT {} FROM videos WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("video {}", id)))?;
    video_from_row(&row)
}

pub async fn get_by_youtube_id(pool: &SqlitePool, youtube_id: &str) -> Result<Video> {
    let sql = format!("SELECT {} FROM videos WHERE youtube_id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(youtube_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("video for YouTube id '{}'", youtube_id)))?;
    video_from_row(&row)
}

pub async fn create(pool: &SqlitePool, new: NewVideo) -> Result<Video> {
    if get_by_youtube_id(pool, &new.youtube_id).await.is_ok() {
        return Err(Error::Conflict(format!(
            "video for YouTube id '{}' already exists",
            new.youtube_id
        )));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO videos (
            id, title, description, youtube_url, youtube_id, thumbnail_url,
            category, related_exhibition_id, related_artist_id, is_visible,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.youtube_url)
    .bind(&new.youtube_id)
    .bind(&new.thumbnail_url)
    .bind(&new.category)
    .bind(new.related_exhibition_id.map(|e| e.to_string()))
    .bind(new.related_artist_id.map(|a| a.to_string()))
    .bind(new.is_visible)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: Uuid, update: VideoUpdate) -> Result<Video> {
    let current = get(pool, id).await?;

    sqlx::query(
        r#"
        UPDATE videos SET title = ?, description = ?, youtube_url = ?,
            youtube_id = ?, thumbnail_url = ?, category = ?,
            related_exhibition_id = ?, related_artist_id = ?, is_visible = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.title.unwrap_or(current.title))
    .bind(update.description.or(current.description))
    .bind(update.youtube_url.unwrap_or(current.youtube_url))
    .bind(update.youtube_id.unwrap_or(current.youtube_id))
    .bind(update.thumbnail_url.or(current.thumbnail_url))
    .bind(update.category.or(current.category))
    .bind(
        update
            .related_exhibition_id
            .or(current.related_exhibition_id)
            .map(|e| e.to_string()),
    )
    .bind(
        update
            .related_artist_id
            .or(current.related_artist_id)
            .map(|a| a.to_string()),
    )
    .bind(update.is_visible.unwrap_or(current.is_visible))
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM videos WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("video {}", id)));
    }
    Ok(())
}

pub async fn set_visibility(pool: &SqlitePool, id: Uuid, visible: bool) -> Result<Video> {
    update(
        pool,
        id,
        VideoUpdate {
            is_visible: Some(visible),
            ..VideoUpdate::default()
        },
    )
    .await
}

/// Distinct categories of visible videos, sorted.
pub async fn categories(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT category FROM videos
         WHERE is_visible = 1 AND category IS NOT NULL
         ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}
