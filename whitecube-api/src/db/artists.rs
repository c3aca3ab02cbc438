//! Artist database operations

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use whitecube_common::models::Artist;
use whitecube_common::{Error, Result};

use super::parse_uuid;

/// Listing parameters for artists.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ArtistQuery {
    /// Substring match against name and biography.
    pub query: Option<String>,
    /// `name` (default, ascending) or `created_at` (newest first).
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewArtist {
    pub name: String,
    pub slug: String,
    pub biography: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ArtistUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub biography: Option<String>,
}

const COLUMNS: &str =
    "id, name, slug, biography, profile_image_url, profile_image_path, created_at, updated_at";

fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    let id: String = row.get("id");
    Ok(Artist {
        id: parse_uuid(&id, "artists.id")?,
        name: row.get("name"),
        slug: row.get("slug"),
        biography: row.get("biography"),
        profile_image_url: row.get("profile_image_url"),
        profile_image_path: row.get("profile_image_path"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn list(pool: &SqlitePool, query: &ArtistQuery) -> Result<Vec<Artist>> {
    let mut sql = format!("SELECT {} FROM artists WHERE 1 = 1", COLUMNS);
    if query.query.is_some() {
        sql.push_str(" AND (name LIKE ? OR biography LIKE ?)");
    }
    sql.push_str(match query.sort_by.as_deref() {
        Some("created_at") => " ORDER BY created_at DESC",
        _ => " ORDER BY name ASC",
    });
    sql.push_str(" LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql);
    if let Some(text) = &query.query {
        let pattern = format!("%{}%", text);
        q = q.bind(pattern.clone()).bind(pattern);
    }
    q = q
        .bind(query.limit.unwrap_or(-1))
        .bind(query.offset.unwrap_or(0));

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(artist_from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Artist> {
    let sql = format!("SELECT {} FROM artists WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artist {}", id)))?;
    artist_from_row(&row)
}

pub async fn get_by_slug(pool: &SqlitePool, slug: &str) -> Result<Artist> {
    let sql = format!("SELECT {} FROM artists WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artist '{}'", slug)))?;
    artist_from_row(&row)
}

pub async fn create(pool: &SqlitePool, new: NewArtist) -> Result<Artist> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO artists (id, name, slug, biography, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(&new.name)
    .bind(&new.slug)
    .bind(&new.biography)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: Uuid, update: ArtistUpdate) -> Result<Artist> {
    let current = get(pool, id).await?;

    sqlx::query(
        "UPDATE artists SET name = ?, slug = ?, biography = ?, updated_at = ? WHERE id = ?",
    )
    .bind(update.name.unwrap_or(current.name))
    .bind(update.slug.unwrap_or(current.slug))
    .bind(update.biography.or(current.biography))
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Record a newly-uploaded profile image (URL plus exact storage path).
pub async fn set_profile_image(
    pool: &SqlitePool,
    id: Uuid,
    image_url: &str,
    storage_path: &str,
) -> Result<Artist> {
    let result = sqlx::query(
        "UPDATE artists SET profile_image_url = ?, profile_image_path = ?, updated_at = ? WHERE id = ?",
    )
    .bind(image_url)
    .bind(storage_path)
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artist {}", id)));
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artist {}", id)));
    }
    Ok(())
}
