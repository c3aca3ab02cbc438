//! whitecube-api - Gallery back-office HTTP service
//!
//! REST API over the gallery catalogue (exhibitions, artists, artworks,
//! news posts, videos, newsletter) plus the image upload pipeline backed
//! by object storage.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cleanup;
pub mod db;
pub mod error;
pub mod storage;
pub mod upload;

pub use error::{ApiError, ApiResult};

use storage::ObjectStore;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub store: Arc<dyn ObjectStore>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build the full application router.
///
/// The body limit leaves room for a multi-file batch; individual files are
/// still capped by upload validation.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::exhibition_routes())
        .merge(api::image_routes())
        .merge(api::artist_routes())
        .merge(api::artwork_routes())
        .merge(api::news_routes())
        .merge(api::video_routes())
        .merge(api::newsletter_routes())
        .merge(api::storage_routes())
        .layer(DefaultBodyLimit::max(256 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
