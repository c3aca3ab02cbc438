//! Artwork API handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use whitecube_common::models::Artwork;
use whitecube_common::Bucket;

use crate::api::artists::read_single_file;
use crate::db::artworks::{self, ArtworkQuery, ArtworkUpdate, NewArtwork};
use crate::error::{ApiError, ApiResult};
use crate::upload;
use crate::AppState;

/// GET /artworks
pub async fn list_artworks(
    State(state): State<AppState>,
    Query(query): Query<ArtworkQuery>,
) -> ApiResult<Json<Vec<Artwork>>> {
    Ok(Json(artworks::list(&state.db, &query).await?))
}

/// GET /artworks/{id}
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Artwork>> {
    Ok(Json(artworks::get(&state.db, id).await?))
}

/// GET /artworks/slug/{slug}
pub async fn get_artwork_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Artwork>> {
    Ok(Json(artworks::get_by_slug(&state.db, &slug).await?))
}

/// POST /artworks
pub async fn create_artwork(
    State(state): State<AppState>,
    Json(new): Json<NewArtwork>,
) -> ApiResult<(StatusCode, Json<Artwork>)> {
    let created = artworks::create(&state.db, new).await?;
    tracing::info!("Created artwork {} ({})", created.id, created.slug);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /artworks/{id}
pub async fn update_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ArtworkUpdate>,
) -> ApiResult<Json<Artwork>> {
    Ok(Json(artworks::update(&state.db, id, update).await?))
}

/// POST /artworks/{id}/image (multipart, single `file` part)
pub async fn upload_artwork_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Artwork>> {
    artworks::get(&state.db, id).await?;

    let file = read_single_file(multipart).await?;
    let folder = format!("artwork_{}", id);

    let mut results = upload::upload_files(
        state.store.as_ref(),
        Bucket::Artworks,
        Some(&folder),
        None,
        vec![file],
        |_, _| {},
    )
    .await;

    let result = results.remove(0);
    if !result.success {
        return Err(ApiError::BadRequest(
            result.error.unwrap_or_else(|| "upload failed".to_string()),
        ));
    }

    let updated = artworks::set_image(
        &state.db,
        id,
        result.public_url.as_deref().unwrap_or_default(),
        result.storage_path.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /artworks/{id}
pub async fn delete_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    artworks::delete(&state.db, id).await?;
    tracing::info!("Deleted artwork {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn artwork_routes() -> Router<AppState> {
    Router::new()
        .route("/artworks", get(list_artworks).post(create_artwork))
        .route(
            "/artworks/:id",
            get(get_artwork)
                .patch(update_artwork)
                .delete(delete_artwork),
        )
        .route("/artworks/slug/:slug", get(get_artwork_by_slug))
        .route("/artworks/:id/image", post(upload_artwork_image))
}
