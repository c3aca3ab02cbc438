//! Core domain enumerations
//!
//! The image-type taxonomy is a closed set: a stored value outside it is a
//! defined error at read time, never silently dropped from views.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an image attached to an exhibition.
///
/// At most one image per exhibition may hold `Poster` (enforced by a partial
/// unique index and the promotion transaction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Poster,
    Artwork,
    Installation,
    Detail,
    Opening,
    Space,
}

impl ImageType {
    /// All taxonomy values, in presentation order.
    pub const ALL: [ImageType; 6] = [
        ImageType::Poster,
        ImageType::Artwork,
        ImageType::Installation,
        ImageType::Detail,
        ImageType::Opening,
        ImageType::Space,
    ];

    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Poster => "poster",
            ImageType::Artwork => "artwork",
            ImageType::Installation => "installation",
            ImageType::Detail => "detail",
            ImageType::Opening => "opening",
            ImageType::Space => "space",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "poster" => Ok(ImageType::Poster),
            "artwork" => Ok(ImageType::Artwork),
            "installation" => Ok(ImageType::Installation),
            "detail" => Ok(ImageType::Detail),
            "opening" => Ok(ImageType::Opening),
            "space" => Ok(ImageType::Space),
            other => Err(Error::InvalidInput(format!(
                "unknown image type: {}",
                other
            ))),
        }
    }
}

/// Named partitions in the object storage collaborator, one per major entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Exhibitions,
    Artists,
    Artworks,
    General,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Exhibitions => "exhibitions",
            Bucket::Artists => "artists",
            Bucket::Artworks => "artworks",
            Bucket::General => "general",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exhibitions" => Ok(Bucket::Exhibitions),
            "artists" => Ok(Bucket::Artists),
            "artworks" => Ok(Bucket::Artworks),
            "general" => Ok(Bucket::General),
            other => Err(Error::InvalidInput(format!("unknown bucket: {}", other))),
        }
    }
}

/// Publication state of an exhibition.
///
/// `Draft` is explicit; the other three are derived from the show's dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhibitionStatus {
    Draft,
    Scheduled,
    Live,
    Archived,
}

impl ExhibitionStatus {
    /// Derive status from the show's date range.
    pub fn from_dates(start: NaiveDate, end: NaiveDate, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        if today < start {
            ExhibitionStatus::Scheduled
        } else if today > end {
            ExhibitionStatus::Archived
        } else {
            ExhibitionStatus::Live
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExhibitionStatus::Draft => "draft",
            ExhibitionStatus::Scheduled => "scheduled",
            ExhibitionStatus::Live => "live",
            ExhibitionStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ExhibitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExhibitionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(ExhibitionStatus::Draft),
            "scheduled" => Ok(ExhibitionStatus::Scheduled),
            "live" => Ok(ExhibitionStatus::Live),
            "archived" => Ok(ExhibitionStatus::Archived),
            other => Err(Error::InvalidInput(format!(
                "unknown exhibition status: {}",
                other
            ))),
        }
    }
}
