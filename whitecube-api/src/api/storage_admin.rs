//! Storage maintenance endpoints

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use whitecube_common::Bucket;

use crate::cleanup;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub bucket: Bucket,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub bucket: Bucket,
    pub removed: usize,
}

/// POST /storage/cleanup
///
/// Manually-triggered sweep deleting objects no database record points at.
pub async fn cleanup_bucket(
    State(state): State<AppState>,
    Json(request): Json<CleanupRequest>,
) -> ApiResult<Json<CleanupResponse>> {
    let removed =
        cleanup::sweep_bucket(&state.db, state.store.as_ref(), request.bucket).await?;
    Ok(Json(CleanupResponse {
        bucket: request.bucket,
        removed,
    }))
}

pub fn storage_routes() -> Router<AppState> {
    Router::new().route("/storage/cleanup", post(cleanup_bucket))
}
