//! News post API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use whitecube_common::models::NewsPost;

use crate::db::news::{self, InstagramSync, NewNewsPost, NewsPostUpdate, NewsQuery, NewsStats};
use crate::error::ApiResult;
use crate::AppState;

/// GET /news
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Json<Vec<NewsPost>>> {
    Ok(Json(news::list(&state.db, &query).await?))
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

/// GET /news/recent
pub async fn recent_news(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> ApiResult<Json<Vec<NewsPost>>> {
    Ok(Json(
        news::recent(&state.db, params.limit.unwrap_or(5), true).await?,
    ))
}

/// GET /news/stats
pub async fn news_stats(State(state): State<AppState>) -> ApiResult<Json<NewsStats>> {
    Ok(Json(news::stats(&state.db).await?))
}

/// GET /news/{id}
pub async fn get_news_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NewsPost>> {
    Ok(Json(news::get(&state.db, id).await?))
}

/// GET /news/instagram/{instagram_post_id}
pub async fn get_by_instagram_id(
    State(state): State<AppState>,
    Path(instagram_post_id): Path<String>,
) -> ApiResult<Json<Option<NewsPost>>> {
    Ok(Json(
        news::get_by_instagram_id(&state.db, &instagram_post_id, true).await?,
    ))
}

/// POST /news
pub async fn create_news_post(
    State(state): State<AppState>,
    Json(new): Json<NewNewsPost>,
) -> ApiResult<(StatusCode, Json<NewsPost>)> {
    let created = news::create(&state.db, new).await?;
    tracing::info!("Created news post {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /news/{id}
pub async fn update_news_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<NewsPostUpdate>,
) -> ApiResult<Json<NewsPost>> {
    Ok(Json(news::update(&state.db, id, update).await?))
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_visible: bool,
}

/// POST /news/{id}/visibility
pub async fn set_news_visibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<VisibilityRequest>,
) -> ApiResult<Json<NewsPost>> {
    Ok(Json(
        news::set_visibility(&state.db, id, request.is_visible).await?,
    ))
}

/// POST /news/sync
///
/// Upserts one Instagram post; repeated syncs update the record in place.
pub async fn sync_news_post(
    State(state): State<AppState>,
    Json(sync): Json<InstagramSync>,
) -> ApiResult<Json<NewsPost>> {
    let post = news::sync_from_instagram(&state.db, sync).await?;
    tracing::info!(
        "Synced Instagram post {} as news post {}",
        post.instagram_post_id.as_deref().unwrap_or("?"),
        post.id
    );
    Ok(Json(post))
}

/// DELETE /news/{id}
pub async fn delete_news_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    news::delete(&state.db, id).await?;
    tracing::info!("Deleted news post {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news).post(create_news_post))
        .route("/news/recent", get(recent_news))
        .route("/news/stats", get(news_stats))
        .route("/news/sync", post(sync_news_post))
        .route(
            "/news/:id",
            get(get_news_post)
                .patch(update_news_post)
                .delete(delete_news_post),
        )
        .route("/news/:id/visibility", post(set_news_visibility))
        .route("/news/instagram/:instagram_post_id", get(get_by_instagram_id))
}
