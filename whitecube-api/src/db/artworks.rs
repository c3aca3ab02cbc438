//! Artwork database operations

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use whitecube_common::models::Artwork;
use whitecube_common::{Error, Result};

use super::parse_uuid;

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ArtworkQuery {
    pub artist_id: Option<Uuid>,
    /// Substring match against title and medium.
    pub query: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewArtwork {
    pub title: String,
    pub artist_id: Option<Uuid>,
    pub year: Option<i64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub slug: String,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ArtworkUpdate {
    pub title: Option<String>,
    pub artist_id: Option<Uuid>,
    pub year: Option<i64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub slug: Option<String>,
}

const COLUMNS: &str = "id, title, artist_id, year, medium, dimensions, image_url, storage_path, slug, created_at, updated_at";

fn artwork_from_row(row: &SqliteRow) -> Result<Artwork> {
    let id: String = row.get("id");
    let artist_id: Option<String> = row.get("artist_id");

    Ok(Artwork {
        id: parse_uuid(&id, "artworks.id")?,
        title: row.get("title"),
        artist_id: artist_id
            .as_deref()
            .map(|s| parse_uuid(s, "artworks.artist_id"))
            .transpose()?,
        year: row.get("year"),
        medium: row.get("medium"),
        dimensions: row.get("dimensions"),
        image_url: row.get("image_url"),
        storage_path: row.get("storage_path"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn list(pool: &SqlitePool, query: &ArtworkQuery) -> Result<Vec<Artwork>> {
    let mut sql = format!("SELECT {} FROM artworks WHERE 1 = 1", COLUMNS);
    if query.artist_id.is_some() {
        sql.push_str(" AND artist_id = ?");
    }
    if query.query.is_some() {
        sql.push_str(" AND (title LIKE ? OR medium LIKE ?)");
    }
    sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql);
    if let Some(artist_id) = query.artist_id {
        q = q.bind(artist_id.to_string());
    }
    if let Some(text) = &query.query {
        let pattern = format!("%{}%", text);
        q = q.bind(pattern.clone()).bind(pattern);
    }
    q = q
        .bind(query.limit.unwrap_or(-1))
        .bind(query.offset.unwrap_or(0));

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(artwork_from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Artwork> {
    let sql = format!("SELECT {} FROM artworks WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artwork {}", id)))?;
    artwork_from_row(&row)
}

pub async fn get_by_slug(pool: &SqlitePool, slug: &str) -> Result<Artwork> {
    let sql = format!("SELECT {} FROM artworks WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artwork '{}'", slug)))?;
    artwork_from_row(&row)
}

pub async fn create(pool: &SqlitePool, new: NewArtwork) -> Result<Artwork> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO artworks (id, title, artist_id, year, medium, dimensions, slug, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&new.title)
    .bind(new.artist_id.map(|a| a.to_string()))
    .bind(new.year)
    .bind(&new.medium)
    .bind(&new.dimensions)
    .bind(&new.slug)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: Uuid, update: ArtworkUpdate) -> Result<Artwork> {
    let current = get(pool, id).await?;

    sqlx::query(
        r#"
        UPDATE artworks SET title = ?, artist_id = ?, year = ?, medium = ?,
            dimensions = ?, slug = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.title.unwrap_or(current.title))
    .bind(update.artist_id.or(current.artist_id).map(|a| a.to_string()))
    .bind(update.year.or(current.year))
    .bind(update.medium.or(current.medium))
    .bind(update.dimensions.or(current.dimensions))
    .bind(update.slug.unwrap_or(current.slug))
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Record a newly-uploaded primary image (URL plus exact storage path).
pub async fn set_image(
    pool: &SqlitePool,
    id: Uuid,
    image_url: &str,
    storage_path: &str,
) -> Result<Artwork> {
    let result = sqlx::query(
        "UPDATE artworks SET image_url = ?, storage_path = ?, updated_at = ? WHERE id = ?",
    )
    .bind(image_url)
    .bind(storage_path)
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artwork {}", id)));
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM artworks WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artwork {}", id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::artists::{self, NewArtist};

    async fn test_pool() -> SqlitePool {
        whitecube_common::db::connect_memory().await.unwrap()
    }

    #[tokio::test]
    async fn crud_and_by_artist_listing() {
        let pool = test_pool().await;
        let artist = artists::create(
            &pool,
            NewArtist {
                name: "Mina Cho".to_string(),
                slug: "mina-cho".to_string(),
                biography: None,
            },
        )
        .await
        .unwrap();

        let work = create(
            &pool,
            NewArtwork {
                title: "Untitled I".to_string(),
                artist_id: Some(artist.id),
                year: Some(2024),
                medium: Some("Oil on canvas".to_string()),
                dimensions: Some("100 x 80 cm".to_string()),
                slug: "untitled-i".to_string(),
            },
        )
        .await
        .unwrap();

        let by_artist = list(
            &pool,
            &ArtworkQuery {
                artist_id: Some(artist.id),
                ..ArtworkQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_artist.len(), 1);
        assert_eq!(by_artist[0].id, work.id);

        let updated = update(
            &pool,
            work.id,
            ArtworkUpdate {
                year: Some(2025),
                ..ArtworkUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.year, Some(2025));

        delete(&pool, work.id).await.unwrap();
        assert!(matches!(get(&pool, work.id).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_artist_detaches_artworks() {
        let pool = test_pool().await;
        let artist = artists::create(
            &pool,
            NewArtist {
                name: "Yun".to_string(),
                slug: "yun".to_string(),
                biography: None,
            },
        )
        .await
        .unwrap();
        let work = create(
            &pool,
            NewArtwork {
                title: "Piece".to_string(),
                artist_id: Some(artist.id),
                year: None,
                medium: None,
                dimensions: None,
                slug: "piece".to_string(),
            },
        )
        .await
        .unwrap();

        artists::delete(&pool, artist.id).await.unwrap();
        let detached = get(&pool, work.id).await.unwrap();
        assert_eq!(detached.artist_id, None);
    }
}
