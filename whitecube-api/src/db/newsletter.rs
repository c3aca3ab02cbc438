//! Newsletter subscriber database operations

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use whitecube_common::models::NewsletterSubscriber;
use whitecube_common::{Error, Result};

use super::parse_uuid;
use uuid::Uuid;

const COLUMNS: &str = "id, email, subscribed_at, is_active";

fn subscriber_from_row(row: &SqliteRow) -> Result<NewsletterSubscriber> {
    let id: String = row.get("id");
    Ok(NewsletterSubscriber {
        id: parse_uuid(&id, "newsletter_subscribers.id")?,
        email: row.get("email"),
        subscribed_at: row.get("subscribed_at"),
        is_active: row.get("is_active"),
    })
}

async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<NewsletterSubscriber>> {
    let sql = format!(
        "SELECT {} FROM newsletter_subscribers WHERE email = ?",
        COLUMNS
    );
    let row = sqlx::query(&sql).bind(email).fetch_optional(pool).await?;
    row.as_ref().map(subscriber_from_row).transpose()
}

/// Subscribe an email address.
///
/// An inactive subscription is reactivated with a fresh timestamp; an active
/// one is a conflict.
pub async fn subscribe(pool: &SqlitePool, email: &str) -> Result<NewsletterSubscriber> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(Error::InvalidInput(format!("invalid email: {}", email)));
    }

    if let Some(existing) = find_by_email(pool, &email).await? {
        if existing.is_active {
            return Err(Error::Conflict(format!("{} is already subscribed", email)));
        }

        sqlx::query(
            "UPDATE newsletter_subscribers SET is_active = 1, subscribed_at = ? WHERE email = ?",
        )
        .bind(Utc::now())
        .bind(&email)
        .execute(pool)
        .await?;

        return find_by_email(pool, &email)
            .await?
            .ok_or_else(|| Error::Internal("subscriber vanished during reactivation".to_string()));
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO newsletter_subscribers (id, email, subscribed_at, is_active) VALUES (?, ?, ?, 1)",
    )
    .bind(id.to_string())
    .bind(&email)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    find_by_email(pool, &email)
        .await?
        .ok_or_else(|| Error::Internal("subscriber vanished after insert".to_string()))
}

/// Mark a subscription inactive. Unknown addresses are a no-op.
pub async fn unsubscribe(pool: &SqlitePool, email: &str) -> Result<()> {
    let email = email.trim().to_lowercase();
    sqlx::query("UPDATE newsletter_subscribers SET is_active = 0 WHERE email = ?")
        .bind(&email)
        .execute(pool)
        .await?;
    Ok(())
}

/// All subscribers, newest first. `active_only` filters out unsubscribed
/// addresses.
pub async fn list(pool: &SqlitePool, active_only: bool) -> Result<Vec<NewsletterSubscriber>> {
    let mut sql = format!("SELECT {} FROM newsletter_subscribers", COLUMNS);
    if active_only {
        sql.push_str(" WHERE is_active = 1");
    }
    sql.push_str(" ORDER BY subscribed_at DESC");

    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(subscriber_from_row).collect()
}
