//! Newsletter API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use whitecube_common::models::NewsletterSubscriber;

use crate::db::newsletter;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// POST /newsletter/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<(StatusCode, Json<NewsletterSubscriber>)> {
    let subscriber = newsletter::subscribe(&state.db, &request.email).await?;
    tracing::info!("Newsletter subscription for {}", subscriber.email);
    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// POST /newsletter/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<StatusCode> {
    newsletter::unsubscribe(&state.db, &request.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSubscribersParams {
    #[serde(default)]
    pub active_only: bool,
}

/// GET /newsletter/subscribers
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(params): Query<ListSubscribersParams>,
) -> ApiResult<Json<Vec<NewsletterSubscriber>>> {
    Ok(Json(newsletter::list(&state.db, params.active_only).await?))
}

pub fn newsletter_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter/subscribe", post(subscribe))
        .route("/newsletter/unsubscribe", post(unsubscribe))
        .route("/newsletter/subscribers", get(list_subscribers))
}
