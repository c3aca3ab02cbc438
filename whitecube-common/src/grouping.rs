//! Grouping/stats projector for exhibition images
//!
//! Pure projections over an already-fetched image list. Safe to recompute on
//! every render; input order is preserved within each group. Because
//! `ImageType` is a closed enum parsed at read time, there is no "unknown
//! type" bucket for images to silently vanish into.

use crate::models::ExhibitionImage;
use crate::types::ImageType;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-type partition of one exhibition's images.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedImages {
    pub poster: Vec<ExhibitionImage>,
    pub artwork: Vec<ExhibitionImage>,
    pub installation: Vec<ExhibitionImage>,
    pub detail: Vec<ExhibitionImage>,
    pub opening: Vec<ExhibitionImage>,
    pub space: Vec<ExhibitionImage>,
    /// Unfiltered input, in its original order.
    pub all: Vec<ExhibitionImage>,
    pub count: ImageCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageCounts {
    pub poster: usize,
    pub artwork: usize,
    pub installation: usize,
    pub detail: usize,
    pub opening: usize,
    pub space: usize,
    pub total: usize,
}

/// Partition a flat image list by type, preserving input order.
pub fn group_by_type(images: Vec<ExhibitionImage>) -> GroupedImages {
    let mut grouped = GroupedImages {
        count: ImageCounts {
            total: images.len(),
            ..ImageCounts::default()
        },
        ..GroupedImages::default()
    };

    for image in &images {
        match image.image_type {
            ImageType::Poster => {
                grouped.poster.push(image.clone());
                grouped.count.poster += 1;
            }
            ImageType::Artwork => {
                grouped.artwork.push(image.clone());
                grouped.count.artwork += 1;
            }
            ImageType::Installation => {
                grouped.installation.push(image.clone());
                grouped.count.installation += 1;
            }
            ImageType::Detail => {
                grouped.detail.push(image.clone());
                grouped.count.detail += 1;
            }
            ImageType::Opening => {
                grouped.opening.push(image.clone());
                grouped.count.opening += 1;
            }
            ImageType::Space => {
                grouped.space.push(image.clone());
                grouped.count.space += 1;
            }
        }
    }

    grouped.all = images;
    grouped
}

/// Summary statistics for one exhibition's images.
#[derive(Debug, Clone, Serialize)]
pub struct ImageStats {
    pub total_images: usize,
    pub images_by_type: BTreeMap<String, usize>,
    /// Images created within the last 24 hours of `now`.
    pub recently_added: usize,
}

/// Derive summary statistics. `now` is passed in so the projection stays pure.
pub fn image_stats(images: &[ExhibitionImage], now: DateTime<Utc>) -> ImageStats {
    let mut by_type = BTreeMap::new();
    for ty in ImageType::ALL {
        by_type.insert(
            ty.as_str().to_string(),
            images.iter().filter(|i| i.image_type == ty).count(),
        );
    }

    let cutoff = now - Duration::hours(24);
    let recently_added = images.iter().filter(|i| i.created_at > cutoff).count();

    ImageStats {
        total_images: images.len(),
        images_by_type: by_type,
        recently_added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn image(ty: ImageType, order: i64, created_at: DateTime<Utc>) -> ExhibitionImage {
        ExhibitionImage {
            id: Uuid::new_v4(),
            exhibition_id: Uuid::nil(),
            image_url: format!("https://cdn.example.com/{}/{}.jpg", ty, order),
            storage_path: Some(format!("{}_{}.jpg", ty, order)),
            alt_text: None,
            display_order: order,
            image_type: ty,
            created_at,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn grouping_partitions_and_counts() {
        let images = vec![
            image(ImageType::Poster, 0, t0()),
            image(ImageType::Artwork, 0, t0()),
            image(ImageType::Artwork, 1, t0()),
            image(ImageType::Detail, 0, t0()),
        ];

        let grouped = group_by_type(images);
        assert_eq!(grouped.poster.len(), 1);
        assert_eq!(grouped.artwork.len(), 2);
        assert_eq!(grouped.detail.len(), 1);
        assert_eq!(grouped.installation.len(), 0);
        assert_eq!(grouped.all.len(), 4);
        assert_eq!(grouped.count.artwork, 2);
        assert_eq!(grouped.count.total, 4);
    }

    #[test]
    fn grouping_preserves_input_order_within_groups() {
        let a = image(ImageType::Artwork, 5, t0());
        let b = image(ImageType::Artwork, 2, t0());
        let grouped = group_by_type(vec![a.clone(), b.clone()]);
        assert_eq!(grouped.artwork[0].id, a.id);
        assert_eq!(grouped.artwork[1].id, b.id);
    }

    #[test]
    fn grouping_is_idempotent() {
        let images = vec![
            image(ImageType::Poster, 0, t0()),
            image(ImageType::Space, 0, t0()),
        ];
        let first = group_by_type(images.clone());
        let second = group_by_type(images);
        assert_eq!(first.count, second.count);
        assert_eq!(first.all, second.all);
        assert_eq!(first.poster, second.poster);
        assert_eq!(first.space, second.space);
    }

    #[test]
    fn stats_count_recent_additions() {
        let now = t0();
        let images = vec![
            image(ImageType::Artwork, 0, now - Duration::hours(2)),
            image(ImageType::Artwork, 1, now - Duration::hours(48)),
            image(ImageType::Poster, 0, now - Duration::minutes(5)),
        ];

        let stats = image_stats(&images, now);
        assert_eq!(stats.total_images, 3);
        assert_eq!(stats.images_by_type["artwork"], 2);
        assert_eq!(stats.images_by_type["poster"], 1);
        assert_eq!(stats.images_by_type["space"], 0);
        assert_eq!(stats.recently_added, 2);
    }
}
