//! Artist API handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use whitecube_common::models::Artist;
use whitecube_common::Bucket;

use crate::db::artists::{self, ArtistQuery, ArtistUpdate, NewArtist};
use crate::error::{ApiError, ApiResult};
use crate::upload;
use crate::AppState;

/// GET /artists
pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<ArtistQuery>,
) -> ApiResult<Json<Vec<Artist>>> {
    Ok(Json(artists::list(&state.db, &query).await?))
}

/// GET /artists/{id}
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(artists::get(&state.db, id).await?))
}

/// GET /artists/slug/{slug}
pub async fn get_artist_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(artists::get_by_slug(&state.db, &slug).await?))
}

/// POST /artists
pub async fn create_artist(
    State(state): State<AppState>,
    Json(new): Json<NewArtist>,
) -> ApiResult<(StatusCode, Json<Artist>)> {
    let created = artists::create(&state.db, new).await?;
    tracing::info!("Created artist {} ({})", created.id, created.slug);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /artists/{id}
pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ArtistUpdate>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(artists::update(&state.db, id, update).await?))
}

/// POST /artists/{id}/profile-image (multipart, single `file` part)
///
/// Runs the single file through the same validate/name/store pipeline as
/// exhibition images, then records the URL and exact storage path.
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Artist>> {
    artists::get(&state.db, id).await?;

    let file = read_single_file(multipart).await?;
    let folder = format!("artist_{}", id);

    let mut results = upload::upload_files(
        state.store.as_ref(),
        Bucket::Artists,
        Some(&folder),
        Some("profile"),
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

    let updated = artists::set_profile_image(
        &state.db,
        id,
        result.public_url.as_deref().unwrap_or_default(),
        result.storage_path.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /artists/{id}
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    artists::delete(&state.db, id).await?;
    tracing::info!("Deleted artist {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the one `file` part out of a multipart body.
pub(crate) async fn read_single_file(mut multipart: Multipart) -> ApiResult<upload::UploadFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("unreadable file part: {}", e)))?;
        return Ok(upload::UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::BadRequest("no file in upload".to_string()))
}

pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists).post(create_artist))
        .route(
            "/artists/:id",
            get(get_artist).patch(update_artist).delete(delete_artist),
        )
        .route("/artists/slug/:slug", get(get_artist_by_slug))
        .route("/artists/:id/profile-image", post(upload_profile_image))
}
