//! Database access for whitecube
//!
//! Pool initialization and schema maintenance for the shared SQLite database.

pub mod schema;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

pub use schema::init_tables;

/// Initialize database connection pool
///
/// Connects to the database file under the data directory, creating the file
/// and schema on first run. Foreign keys are enabled on every connection
/// (SQLite defaults them off).
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Connecting to database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// In-memory pool for tests.
///
/// A single connection is mandatory: every new in-memory connection would see
/// its own empty database.
pub async fn connect_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_tables(&pool).await?;
    Ok(pool)
}
