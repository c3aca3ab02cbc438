//! Database facades for whitecube-api
//!
//! Thin per-table query wrappers over the shared SQLite pool. UUIDs are
//! stored as TEXT and parsed on read; image types are parsed into the closed
//! taxonomy at read time and rejected if unknown.

pub mod artists;
pub mod artworks;
pub mod exhibitions;
pub mod images;
pub mod news;
pub mod newsletter;
pub mod videos;

use uuid::Uuid;
use whitecube_common::{Error, Result};

/// Parse a TEXT uuid column value.
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::Internal(format!("invalid uuid in {}: {}", column, e)))
}
