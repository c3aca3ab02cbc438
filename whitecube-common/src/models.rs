//! Record models shared across services

use crate::types::{ExhibitionStatus, ImageType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One image attached to one exhibition.
///
/// `display_order` is scoped per `(exhibition_id, image_type)` group; it is not
/// a global ordering across types. `storage_path` is the exact object key in
/// the exhibitions bucket, recorded so cleanup can match paths exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitionImage {
    pub id: Uuid,
    pub exhibition_id: Uuid,
    pub image_url: String,
    pub storage_path: Option<String>,
    pub alt_text: Option<String>,
    pub display_order: i64,
    pub image_type: ImageType,
    pub created_at: DateTime<Utc>,
}

/// A time-boxed gallery show, independent of artworks/artists in this model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exhibition {
    pub id: Uuid,
    pub title: String,
    pub artist_name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ExhibitionStatus,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub biography: Option<String>,
    pub profile_image_url: Option<String>,
    pub profile_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Option<Uuid>,
    pub year: Option<i64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub storage_path: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A news item mirrored from (or written like) an Instagram post.
///
/// Hidden posts stay in the database; `is_visible` gates the public feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: Uuid,
    pub instagram_post_id: Option<String>,
    pub caption: Option<String>,
    pub image_urls: Vec<String>,
    pub instagram_url: Option<String>,
    pub post_date: Option<NaiveDate>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A YouTube-hosted video, optionally tied to an exhibition or artist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub youtube_url: String,
    pub youtube_id: String,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub related_exhibition_id: Option<Uuid>,
    pub related_artist_id: Option<Uuid>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}
