//! News post database operations
//!
//! News items mirror Instagram posts; `sync_from_instagram` upserts on the
//! Instagram post id so repeated syncs update in place. `image_urls` is a
//! JSON array in a TEXT column.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use whitecube_common::models::NewsPost;
use whitecube_common::{Error, Result};

use super::parse_uuid;

/// Listing parameters for news posts.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewsQuery {
    /// Substring match against caption and Instagram post id.
    pub query: Option<String>,
    pub is_visible: Option<bool>,
    /// `post_date` (newest first) or `created_at` (default, newest first).
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewNewsPost {
    pub instagram_post_id: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub instagram_url: Option<String>,
    pub post_date: Option<NaiveDate>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewsPostUpdate {
    pub instagram_post_id: Option<String>,
    pub caption: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub instagram_url: Option<String>,
    pub post_date: Option<NaiveDate>,
    pub is_visible: Option<bool>,
}

/// Payload of one Instagram post for `sync_from_instagram`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct InstagramSync {
    pub instagram_post_id: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub instagram_url: String,
    pub post_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsStats {
    pub total: usize,
    pub visible: usize,
    pub hidden: usize,
}

const COLUMNS: &str = "id, instagram_post_id, caption, image_urls, instagram_url, post_date, is_visible, created_at, updated_at";

fn news_from_row(row: &SqliteRow) -> Result<NewsPost> {
    let id: String = row.get("id");
    let image_urls: String = row.get("image_urls");

    Ok(NewsPost {
        id: parse_uuid(&id, "news_posts.id")?,
        instagram_post_id: row.get("instagram_post_id"),
        caption: row.get("caption"),
        image_urls: serde_json::from_str(&image_urls)
            .map_err(|e| Error::Internal(format!("corrupt image_urls in news_posts: {}", e)))?,
        instagram_url: row.get("instagram_url"),
        post_date: row.get("post_date"),
        is_visible: row.get("is_visible"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn list(pool: &SqlitePool, query: &NewsQuery) -> Result<Vec<NewsPost>> {
    let mut sql = format!("SELECT {} FROM news_posts WHERE 1 = 1", COLUMNS);
    if query.query.is_some() {
        sql.push_str(" AND (caption LIKE ? OR instagram_post_id LIKE ?)");
    }
    if query.is_visible.is_some() {
        sql.push_str(" AND is_visible = ?");
    }
    sql.push_str(match query.sort_by.as_deref() {
        Some("post_date") => " ORDER BY post_date DESC",
        _ => " ORDER BY created_at DESC",
    });
    sql.push_str(" LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql);
    if let Some(text) = &query.query {
        let pattern = format!("%{}%", text);
        q = q.bind(pattern.clone()).bind(pattern);
    }
    if let Some(visible) = query.is_visible {
        q = q.bind(visible);
    }
    q = q
        .bind(query.limit.unwrap_or(-1))
        .bind(query.offset.unwrap_or(0));

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(news_from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<NewsPost> {
    let sql = format!("SELECT {} FROM news_posts WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("news post {}", id)))?;
    news_from_row(&row)
}

pub async fn get_by_instagram_id(
    pool: &SqlitePool,
    instagram_post_id: &str,
    visible_only: bool,
) -> Result<Option<NewsPost>> {
    let mut sql = format!(
        "SELECT {} FROM news_posts WHERE instagram_post_id = ?",
        COLUMNS
    );
    if visible_only {
        sql.push_str(" AND is_visible = 1");
    }
    let row = sqlx::query(&sql)
        .bind(instagram_post_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(news_from_row).transpose()
}

pub async fn create(pool: &SqlitePool, new: NewNewsPost) -> Result<NewsPost> {
    if let Some(ig_id) = &new.instagram_post_id {
        if get_by_instagram_id(pool, ig_id, false).await?.is_some() {
            return Err(Error::Conflict(format!(
                "news post for Instagram id {} already exists",
                ig_id
            )));
        }
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let image_urls = serde_json::to_string(&new.image_urls)
        .map_err(|e| Error::Internal(format!("image_urls encoding: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO news_posts (
            id, instagram_post_id, caption, image_urls, instagram_url,
            post_date, is_visible, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&new.instagram_post_id)
    .bind(&new.caption)
    .bind(&image_urls)
    .bind(&new.instagram_url)
    .bind(new.post_date)
    .bind(new.is_visible)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: Uuid, update: NewsPostUpdate) -> Result<NewsPost> {
    let current = get(pool, id).await?;

    let image_urls = update.image_urls.unwrap_or(current.image_urls);
    let image_urls = serde_json::to_string(&image_urls)
        .map_err(|e| Error::Internal(format!("image_urls encoding: {}", e)))?;

    sqlx::query(
        r#"
        UPDATE news_posts SET instagram_post_id = ?, caption = ?, image_urls = ?,
            instagram_url = ?, post_date = ?, is_visible = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.instagram_post_id.or(current.instagram_post_id))
    .bind(update.caption.or(current.caption))
    .bind(&image_urls)
    .bind(update.instagram_url.or(current.instagram_url))
    .bind(update.post_date.or(current.post_date))
    .bind(update.is_visible.unwrap_or(current.is_visible))
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM news_posts WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("news post {}", id)));
    }
    Ok(())
}

pub async fn set_visibility(pool: &SqlitePool, id: Uuid, visible: bool) -> Result<NewsPost> {
    update(
        pool,
        id,
        NewsPostUpdate {
            is_visible: Some(visible),
            ..NewsPostUpdate::default()
        },
    )
    .await
}

/// Most recent posts by post date.
pub async fn recent(pool: &SqlitePool, limit: i64, visible_only: bool) -> Result<Vec<NewsPost>> {
    let mut sql = format!("SELECT {} FROM news_posts", COLUMNS);
    if visible_only {
        sql.push_str(" WHERE is_visible = 1");
    }
    sql.push_str(" ORDER BY post_date DESC LIMIT ?");

    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    rows.iter().map(news_from_row).collect()
}

pub async fn stats(pool: &SqlitePool) -> Result<NewsStats> {
    let (total, visible): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(is_visible), 0) FROM news_posts",
    )
    .fetch_one(pool)
    .await?;

    Ok(NewsStats {
        total: total as usize,
        visible: visible as usize,
        hidden: (total - visible) as usize,
    })
}

/// Upsert one Instagram post: update the existing record for its Instagram id
/// (visibility untouched) or create a new visible one.
pub async fn sync_from_instagram(pool: &SqlitePool, sync: InstagramSync) -> Result<NewsPost> {
    match get_by_instagram_id(pool, &sync.instagram_post_id, false).await? {
        Some(existing) => {
            update(
                pool,
                existing.id,
                NewsPostUpdate {
                    caption: sync.caption,
                    image_urls: Some(sync.image_urls),
                    instagram_url: Some(sync.instagram_url),
                    post_date: Some(sync.post_date),
                    ..NewsPostUpdate::default()
                },
            )
            .await
        }
        None => {
            create(
                pool,
                NewNewsPost {
                    instagram_post_id: Some(sync.instagram_post_id),
                    caption: sync.caption,
                    image_urls: sync.image_urls,
                    instagram_url: Some(sync.instagram_url),
                    post_date: Some(sync.post_date),
                    is_visible: true,
                },
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        whitecube_common::db::connect_memory().await.unwrap()
    }

    fn post(ig_id: &str, date: NaiveDate) -> NewNewsPost {
        NewNewsPost {
            instagram_post_id: Some(ig_id.to_string()),
            caption: Some(format!("Caption for {}", ig_id)),
            image_urls: vec![format!("https://cdn.example.com/{}.jpg", ig_id)],
            instagram_url: Some(format!("https://instagram.com/p/{}", ig_id)),
            post_date: Some(date),
            is_visible: true,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn crud_round_trip_with_image_urls() {
        let pool = test_pool().await;
        let created = create(&pool, post("abc123", d(2025, 5, 1))).await.unwrap();
        assert_eq!(created.image_urls.len(), 1);
        assert!(created.is_visible);

        let updated = update(
            &pool,
            created.id,
            NewsPostUpdate {
                image_urls: Some(vec![
                    "https://cdn.example.com/a.jpg".to_string(),
                    "https://cdn.example.com/b.jpg".to_string(),
                ]),
                ..NewsPostUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.image_urls.len(), 2);
        assert_eq!(updated.caption, created.caption);

        delete(&pool, created.id).await.unwrap();
        assert!(matches!(get(&pool, created.id).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_instagram_id_is_a_conflict() {
        let pool = test_pool().await;
        create(&pool, post("dup", d(2025, 5, 1))).await.unwrap();
        let err = create(&pool, post("dup", d(2025, 6, 1))).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn visibility_gates_listings_but_not_the_record() {
        let pool = test_pool().await;
        let created = create(&pool, post("hideme", d(2025, 5, 1))).await.unwrap();

        let hidden = set_visibility(&pool, created.id, false).await.unwrap();
        assert!(!hidden.is_visible);

        let visible = list(
            &pool,
            &NewsQuery {
                is_visible: Some(true),
                ..NewsQuery::default()
            },
        )
        .await
        .unwrap();
        assert!(visible.is_empty());

        // Hidden posts still exist and count in stats.
        let s = stats(&pool).await.unwrap();
        assert_eq!(
            s,
            NewsStats {
                total: 1,
                visible: 0,
                hidden: 1
            }
        );
    }

    #[tokio::test]
    async fn recent_sorts_by_post_date() {
        let pool = test_pool().await;
        create(&pool, post("old", d(2025, 1, 1))).await.unwrap();
        create(&pool, post("new", d(2025, 6, 1))).await.unwrap();

        let recent = recent(&pool, 1, true).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].instagram_post_id.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn instagram_sync_upserts_in_place() {
        let pool = test_pool().await;

        let first = sync_from_instagram(
            &pool,
            InstagramSync {
                instagram_post_id: "ig1".to_string(),
                caption: Some("Opening".to_string()),
                image_urls: vec!["https://cdn.example.com/1.jpg".to_string()],
                instagram_url: "https://instagram.com/p/ig1".to_string(),
                post_date: d(2025, 5, 1),
            },
        )
        .await
        .unwrap();

        // Hide it, then sync again: content updates, visibility stays.
        set_visibility(&pool, first.id, false).await.unwrap();
        let second = sync_from_instagram(
            &pool,
            InstagramSync {
                instagram_post_id: "ig1".to_string(),
                caption: Some("Opening (edited)".to_string()),
                image_urls: vec![
                    "https://cdn.example.com/1.jpg".to_string(),
                    "https://cdn.example.com/2.jpg".to_string(),
                ],
                instagram_url: "https://instagram.com/p/ig1".to_string(),
                post_date: d(2025, 5, 2),
            },
        )
        .await
        .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.caption.as_deref(), Some("Opening (edited)"));
        assert_eq!(second.image_urls.len(), 2);
        assert!(!second.is_visible);
        assert_eq!(stats(&pool).await.unwrap().total, 1);
    }
}
