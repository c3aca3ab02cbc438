//! Exhibition API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use whitecube_common::models::Exhibition;

use crate::db::exhibitions::{self, ExhibitionQuery, ExhibitionUpdate, NewExhibition};
use crate::error::ApiResult;
use crate::AppState;

/// GET /exhibitions
pub async fn list_exhibitions(
    State(state): State<AppState>,
    Query(query): Query<ExhibitionQuery>,
) -> ApiResult<Json<Vec<Exhibition>>> {
    Ok(Json(exhibitions::list(&state.db, &query).await?))
}

/// GET /exhibitions/{id}
pub async fn get_exhibition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Exhibition>> {
    Ok(Json(exhibitions::get(&state.db, id).await?))
}

/// GET /exhibitions/slug/{slug}
pub async fn get_exhibition_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Exhibition>> {
    Ok(Json(exhibitions::get_by_slug(&state.db, &slug).await?))
}

/// POST /exhibitions
pub async fn create_exhibition(
    State(state): State<AppState>,
    Json(new): Json<NewExhibition>,
) -> ApiResult<(StatusCode, Json<Exhibition>)> {
    let created = exhibitions::create(&state.db, new).await?;
    tracing::info!("Created exhibition {} ({})", created.id, created.slug);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /exhibitions/{id}
pub async fn update_exhibition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ExhibitionUpdate>,
) -> ApiResult<Json<Exhibition>> {
    Ok(Json(exhibitions::update(&state.db, id, update).await?))
}

/// POST /exhibitions/{id}/publish
pub async fn publish_exhibition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Exhibition>> {
    Ok(Json(exhibitions::publish(&state.db, id).await?))
}

/// DELETE /exhibitions/{id}
pub async fn delete_exhibition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    exhibitions::delete(&state.db, id).await?;
    tracing::info!("Deleted exhibition {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn exhibition_routes() -> Router<AppState> {
    Router::new()
        .route("/exhibitions", get(list_exhibitions).post(create_exhibition))
        .route(
            "/exhibitions/:id",
            get(get_exhibition)
                .patch(update_exhibition)
                .delete(delete_exhibition),
        )
        .route("/exhibitions/slug/:slug", get(get_exhibition_by_slug))
        .route("/exhibitions/:id/publish", post(publish_exhibition))
}
