//! HTTP API handlers for whitecube-api

pub mod artists;
pub mod artworks;
pub mod exhibitions;
pub mod health;
pub mod images;
pub mod news;
pub mod newsletter;
pub mod storage_admin;
pub mod videos;

pub use artists::artist_routes;
pub use artworks::artwork_routes;
pub use exhibitions::exhibition_routes;
pub use health::health_routes;
pub use images::image_routes;
pub use news::news_routes;
pub use newsletter::newsletter_routes;
pub use storage_admin::storage_routes;
pub use videos::video_routes;
