//! Error types for whitecube-api
//!
//! HTTP-facing error type mapping the common taxonomy onto status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., second poster, duplicate subscription
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Object storage failure (502)
    #[error("Storage error: {0}")]
    Storage(String),

    /// whitecube-common error
    #[error(transparent)]
    Common(#[from] whitecube_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use whitecube_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Storage(msg) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR", msg),
            ApiError::Common(err) => match err {
                CommonError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                CommonError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
                }
                CommonError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
                CommonError::Storage(msg) => {
                    (StatusCode::BAD_GATEWAY, "STORAGE_ERROR", msg)
                }
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    other.to_string(),
                ),
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
