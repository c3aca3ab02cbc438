//! Table schema initialization
//!
//! Creates all whitecube tables if they don't exist. The "at most one poster
//! per exhibition" rule is a real constraint here (partial unique index), not
//! just a client-side convention.

use crate::Result;
use sqlx::SqlitePool;

/// Create whitecube tables and indexes.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exhibitions (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            description TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            slug TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exhibition_images (
            id TEXT PRIMARY KEY,
            exhibition_id TEXT NOT NULL REFERENCES exhibitions(id) ON DELETE CASCADE,
            image_url TEXT NOT NULL,
            storage_path TEXT,
            alt_text TEXT,
            display_order INTEGER NOT NULL DEFAULT 0,
            image_type TEXT NOT NULL DEFAULT 'artwork',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one poster per exhibition
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_one_poster_per_exhibition
        ON exhibition_images(exhibition_id) WHERE image_type = 'poster'
        "#,
    )
    .execute(pool)
    .await?;

    // Presentation order lookups within a (exhibition, type) group
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_exhibition_images_order
        ON exhibition_images(exhibition_id, image_type, display_order)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            biography TEXT,
            profile_image_url TEXT,
            profile_image_path TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artworks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist_id TEXT REFERENCES artists(id) ON DELETE SET NULL,
            year INTEGER,
            medium TEXT,
            dimensions TEXT,
            image_url TEXT,
            storage_path TEXT,
            slug TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // image_urls holds a JSON array of URLs
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS news_posts (
            id TEXT PRIMARY KEY,
            instagram_post_id TEXT UNIQUE,
            caption TEXT,
            image_urls TEXT NOT NULL DEFAULT '[]',
            instagram_url TEXT,
            post_date TEXT,
            is_visible INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS videos (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            youtube_url TEXT NOT NULL,
            youtube_id TEXT NOT NULL UNIQUE,
            thumbnail_url TEXT,
            category TEXT,
            related_exhibition_id TEXT REFERENCES exhibitions(id) ON DELETE SET NULL,
            related_artist_id TEXT REFERENCES artists(id) ON DELETE SET NULL,
            is_visible INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS newsletter_subscribers (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            subscribed_at TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
