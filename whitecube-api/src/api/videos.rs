//! Video API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use whitecube_common::models::Video;

use crate::db::videos::{self, NewVideo, VideoQuery, VideoUpdate};
use crate::error::ApiResult;
use crate::AppState;

/// GET /videos
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> ApiResult<Json<Vec<Video>>> {
    Ok(Json(videos::list(&state.db, &query).await?))
}

/// GET /videos/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(videos::categories(&state.db).await?))
}

/// GET /videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Video>> {
    Ok(Json(videos::get(&state.db, id).await?))
}

/// GET /videos/youtube/{youtube_id}
pub async fn get_video_by_youtube_id(
    State(state): State<AppState>,
    Path(youtube_id): Path<String>,
) -> ApiResult<Json<Video>> {
    Ok(Json(videos::get_by_youtube_id(&state.db, &youtube_id).await?))
}

/// POST /videos
pub async fn create_video(
    State(state): State<AppState>,
    Json(new): Json<NewVideo>,
) -> ApiResult<(StatusCode, Json<Video>)> {
    let created = videos::create(&state.db, new).await?;
    tracing::info!("Created video {} ({})", created.id, created.youtube_id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /videos/{id}
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<VideoUpdate>,
) -> ApiResult<Json<Video>> {
    Ok(Json(videos::update(&state.db, id, update).await?))
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_visible: bool,
}

/// POST /videos/{id}/visibility
pub async fn set_video_visibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<VisibilityRequest>,
) -> ApiResult<Json<Video>> {
    Ok(Json(
        videos::set_visibility(&state.db, id, request.is_visible).await?,
    ))
}

/// DELETE /videos/{id}
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    videos::delete(&state.db, id).await?;
    tracing::info!("Deleted video {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route("/videos/categories", get(list_categories))
        .route(
            "/videos/:id",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/videos/:id/visibility", post(set_video_visibility))
        .route("/videos/youtube/:youtube_id", get(get_video_by_youtube_id))
}
