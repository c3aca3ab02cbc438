//! Exhibition image API handlers
//!
//! Listing, grouped views, multipart upload, metadata edits, poster
//! promotion, reorder, bulk copy and bulk delete.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use whitecube_common::grouping::{self, GroupedImages, ImageStats};
use whitecube_common::models::ExhibitionImage;
use whitecube_common::{Bucket, ImageType};

use crate::db::exhibitions;
use crate::db::images::{self, ImageQuery, ImageSort, ImageUpdate, NewImage};
use crate::error::{ApiError, ApiResult};
use crate::upload::{self, UploadFile};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListImagesParams {
    pub image_type: Option<ImageType>,
    pub sort_by: Option<ImageSort>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /exhibitions/{id}/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(exhibition_id): Path<Uuid>,
    Query(params): Query<ListImagesParams>,
) -> ApiResult<Json<Vec<ExhibitionImage>>> {
    let query = ImageQuery {
        image_type: params.image_type,
        sort_by: params.sort_by.unwrap_or_default(),
        limit: params.limit,
        offset: params.offset,
    };
    Ok(Json(
        images::list_for_exhibition(&state.db, exhibition_id, &query).await?,
    ))
}

/// GET /exhibitions/{id}/images/grouped
pub async fn grouped_images(
    State(state): State<AppState>,
    Path(exhibition_id): Path<Uuid>,
) -> ApiResult<Json<GroupedImages>> {
    let list = images::list_for_exhibition(
        &state.db,
        exhibition_id,
        &ImageQuery {
            sort_by: ImageSort::TypeThenOrder,
            ..ImageQuery::default()
        },
    )
    .await?;
    Ok(Json(grouping::group_by_type(list)))
}

/// GET /exhibitions/{id}/images/stats
pub async fn image_stats(
    State(state): State<AppState>,
    Path(exhibition_id): Path<Uuid>,
) -> ApiResult<Json<ImageStats>> {
    let list =
        images::list_for_exhibition(&state.db, exhibition_id, &ImageQuery::default()).await?;
    Ok(Json(grouping::image_stats(&list, chrono::Utc::now())))
}

#[derive(Debug, Serialize)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct UploadImagesResponse {
    pub created: Vec<ExhibitionImage>,
    pub failures: Vec<UploadFailure>,
}

/// POST /exhibitions/{id}/images (multipart)
///
/// Fields: repeated `files` parts, optional `image_type` (defaults to
/// `artwork`) and `alt_text`. Every file is validated, written to storage and
/// recorded; failures are reported per file without aborting the batch.
pub async fn upload_images(
    State(state): State<AppState>,
    Path(exhibition_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadImagesResponse>)> {
    // Referential integrity up front: a missing exhibition is a 404, not a
    // storage write followed by an insert failure.
    exhibitions::get(&state.db, exhibition_id).await?;

    let mut image_type = ImageType::Artwork;
    let mut alt_text: Option<String> = None;
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("image_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable image_type: {}", e)))?;
                image_type = value.parse()?;
            }
            Some("alt_text") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable alt_text: {}", e)))?;
                if !value.is_empty() {
                    alt_text = Some(value);
                }
            }
            Some("files") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable file part: {}", e)))?;
                files.push(UploadFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest("no files in upload".to_string()));
    }

    let total = files.len();
    let folder = format!("exhibition_{}", exhibition_id);
    let file_names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();

    let results = upload::upload_files(
        state.store.as_ref(),
        Bucket::Exhibitions,
        Some(&folder),
        Some(image_type.as_str()),
        files,
        |completed, _total| {
            tracing::debug!("Upload progress: {}/{}", completed, total);
        },
    )
    .await;

    let mut created = Vec::new();
    let mut failures = Vec::new();
    let mut next_order = images::next_display_order(&state.db, exhibition_id, image_type).await?;

    for (index, result) in results.into_iter().enumerate() {
        if !result.success {
            failures.push(UploadFailure {
                file_name: file_names[index].clone(),
                error: result
                    .error
                    .unwrap_or_else(|| "upload failed".to_string()),
            });
            continue;
        }

        // Upload and insert are two separate steps by design; an insert
        // failure leaves the stored object for the cleanup sweep.
        let record = images::create_image(
            &state.db,
            NewImage {
                exhibition_id,
                image_url: result.public_url.unwrap_or_default(),
                storage_path: result.storage_path,
                alt_text: alt_text
                    .clone()
                    .or_else(|| Some(format!("{} {}", image_type, index + 1))),
                display_order: next_order,
                image_type,
            },
        )
        .await;

        match record {
            Ok(record) => {
                created.push(record);
                next_order += 1;
            }
            Err(e) => {
                tracing::error!("Image record insert failed: {}", e);
                failures.push(UploadFailure {
                    file_name: file_names[index].clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Uploaded {} of {} images to exhibition {}",
        created.len(),
        total,
        exhibition_id
    );

    Ok((StatusCode::CREATED, Json(UploadImagesResponse { created, failures })))
}

/// PATCH /images/{id}
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ImageUpdate>,
) -> ApiResult<Json<ExhibitionImage>> {
    Ok(Json(images::update_image(&state.db, id, update).await?))
}

/// DELETE /images/{id}
///
/// Removes the record and, best-effort, the backing stored object.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    images::delete_image_with_storage(&state.db, state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /exhibitions/{id}/poster
pub async fn get_poster(
    State(state): State<AppState>,
    Path(exhibition_id): Path<Uuid>,
) -> ApiResult<Json<Option<ExhibitionImage>>> {
    Ok(Json(images::poster_image(&state.db, exhibition_id).await?))
}

/// POST /exhibitions/{id}/images/{image_id}/promote
pub async fn promote_poster(
    State(state): State<AppState>,
    Path((exhibition_id, image_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ExhibitionImage>> {
    let promoted = images::set_poster_image(&state.db, exhibition_id, image_id).await?;
    tracing::info!(
        "Promoted image {} to poster of exhibition {}",
        image_id,
        exhibition_id
    );
    Ok(Json(promoted))
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
    pub orders: Vec<i64>,
}

/// POST /exhibitions/{id}/images/reorder
pub async fn reorder_images(
    State(state): State<AppState>,
    Path(exhibition_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<StatusCode> {
    images::reorder_images(&state.db, exhibition_id, &request.ids, &request.orders).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CopyImagesRequest {
    pub to_exhibition_id: Uuid,
    pub image_types: Option<Vec<ImageType>>,
}

/// POST /exhibitions/{id}/images/copy
pub async fn copy_images(
    State(state): State<AppState>,
    Path(from_exhibition_id): Path<Uuid>,
    Json(request): Json<CopyImagesRequest>,
) -> ApiResult<Json<Vec<ExhibitionImage>>> {
    exhibitions::get(&state.db, request.to_exhibition_id).await?;
    let copies = images::copy_images(
        &state.db,
        from_exhibition_id,
        request.to_exhibition_id,
        request.image_types.as_deref(),
    )
    .await?;
    Ok(Json(copies))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
}

/// POST /images/bulk-delete
///
/// Deletes are issued per item; successes are kept even when others fail, and
/// the aggregate error names the failed ids.
pub async fn bulk_delete_images(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted =
        images::bulk_delete(&state.db, state.store.as_ref(), &request.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/exhibitions/:id/images",
            get(list_images).post(upload_images),
        )
        .route("/exhibitions/:id/images/grouped", get(grouped_images))
        .route("/exhibitions/:id/images/stats", get(image_stats))
        .route("/exhibitions/:id/images/reorder", post(reorder_images))
        .route("/exhibitions/:id/images/copy", post(copy_images))
        .route(
            "/exhibitions/:id/images/:image_id/promote",
            post(promote_poster),
        )
        .route("/exhibitions/:id/poster", get(get_poster))
        .route("/images/:id", axum::routing::patch(update_image).delete(delete_image))
        .route("/images/bulk-delete", post(bulk_delete_images))
}
