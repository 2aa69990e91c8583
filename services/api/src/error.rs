//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Todo does not exist or belongs to someone else
    #[error("Not Found")]
    NotFound,

    /// Request body failed validation
    #[error("{0}")]
    Validation(String),

    /// Request body missing, not JSON, or the wrong shape
    #[error("{0}")]
    Body(#[from] JsonRejection),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
