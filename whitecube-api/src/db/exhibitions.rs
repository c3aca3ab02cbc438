//! Exhibition database operations

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;
use whitecube_common::models::Exhibition;
use whitecube_common::{Error, ExhibitionStatus, Result};

use super::parse_uuid;

/// Listing parameters for exhibitions. Results are sorted by start date,
/// newest first.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ExhibitionQuery {
    /// Filter by status; `None` means all.
    pub status: Option<ExhibitionStatus>,
    /// Substring match against title, artist name and description.
    pub query: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewExhibition {
    pub title: String,
    pub artist_name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slug: String,
    /// Keep the exhibition unpublished instead of deriving a status from its
    /// dates.
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ExhibitionUpdate {
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub slug: Option<String>,
}

const COLUMNS: &str =
    "id, title, artist_name, description, start_date, end_date, status, slug, created_at, updated_at";

fn exhibition_from_row(row: &SqliteRow) -> Result<Exhibition> {
    let id: String = row.get("id");
    let status: String = row.get("status");

    Ok(Exhibition {
        id: parse_uuid(&id, "exhibitions.id")?,
        title: row.get("title"),
        artist_name: row.get("artist_name"),
        description: row.get("description"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        status: ExhibitionStatus::from_str(&status)?,
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn list(pool: &SqlitePool, query: &ExhibitionQuery) -> Result<Vec<Exhibition>> {
    let mut sql = format!("SELECT {} FROM exhibitions WHERE 1 = 1", COLUMNS);
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if query.query.is_some() {
        sql.push_str(" AND (title LIKE ? OR artist_name LIKE ? OR description LIKE ?)");
    }
    sql.push_str(" ORDER BY start_date DESC LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql);
    if let Some(status) = query.status {
        q = q.bind(status.as_str());
    }
    if let Some(text) = &query.query {
        let pattern = format!("%{}%", text);
        q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
    }
    q = q
        .bind(query.limit.unwrap_or(-1))
        .bind(query.offset.unwrap_or(0));

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(exhibition_from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Exhibition> {
    let sql = format!("SELECT {} FROM exhibitions WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("exhibition {}", id)))?;
    exhibition_from_row(&row)
}

pub async fn get_by_slug(pool: &SqlitePool, slug: &str) -> Result<Exhibition> {
    let sql = format!("SELECT {} FROM exhibitions WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("exhibition '{}'", slug)))?;
    exhibition_from_row(&row)
}

/// Create an exhibition. Unless created as a draft, status is derived from
/// the show's dates.
pub async fn create(pool: &SqlitePool, new: NewExhibition) -> Result<Exhibition> {
    if new.end_date < new.start_date {
        return Err(Error::InvalidInput(format!(
            "end date {} precedes start date {}",
            new.end_date, new.start_date
        )));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let status = if new.draft {
        ExhibitionStatus::Draft
    } else {
        ExhibitionStatus::from_dates(new.start_date, new.end_date, now)
    };

    sqlx::query(
        r#"
        INSERT INTO exhibitions (
            id, title, artist_name, description, start_date, end_date,
            status, slug, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&new.title)
    .bind(&new.artist_name)
    .bind(&new.description)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(status.as_str())
    .bind(&new.slug)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Update an exhibition. When either date changes, status is re-derived from
/// the merged date range (drafts stay drafts).
pub async fn update(pool: &SqlitePool, id: Uuid, update: ExhibitionUpdate) -> Result<Exhibition> {
    let current = get(pool, id).await?;

    let start_date = update.start_date.unwrap_or(current.start_date);
    let end_date = update.end_date.unwrap_or(current.end_date);
    if end_date < start_date {
        return Err(Error::InvalidInput(format!(
            "end date {} precedes start date {}",
            end_date, start_date
        )));
    }

    let dates_changed = update.start_date.is_some() || update.end_date.is_some();
    let status = if dates_changed && current.status != ExhibitionStatus::Draft {
        ExhibitionStatus::from_dates(start_date, end_date, Utc::now())
    } else {
        current.status
    };

    sqlx::query(
        r#"
        UPDATE exhibitions SET
            title = ?, artist_name = ?, description = ?, start_date = ?,
            end_date = ?, status = ?, slug = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.title.unwrap_or(current.title))
    .bind(update.artist_name.unwrap_or(current.artist_name))
    .bind(update.description.or(current.description))
    .bind(start_date)
    .bind(end_date)
    .bind(status.as_str())
    .bind(update.slug.unwrap_or(current.slug))
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM exhibitions WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("exhibition {}", id)));
    }
    Ok(())
}

/// Publish a draft: derive a real status from its dates.
pub async fn publish(pool: &SqlitePool, id: Uuid) -> Result<Exhibition> {
    let current = get(pool, id).await?;
    let status = ExhibitionStatus::from_dates(current.start_date, current.end_date, Utc::now());

    sqlx::query("UPDATE exhibitions SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    get(pool, id).await
}
