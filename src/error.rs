/// Unified error types for the Daylog service
use crate::api::response;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Route version does not match the compiled-in version
    #[error("API version mismatch")]
    VersionMismatch,

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store unreachable
    #[error("Store unavailable")]
    Unavailable,

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error body sent to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Convert ApiError to an HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Authentication(_) => (
                StatusCode::FORBIDDEN,
                response::INVALID_CREDENTIALS.to_string(),
            ),
            ApiError::VersionMismatch => (
                StatusCode::BAD_REQUEST,
                response::VERSION_WARNING.to_string(),
            ),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                response::SERVER_UNAVAILABLE.to_string(),
            ),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Database(_) | ApiError::Internal(_) | ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                // Don't leak details
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse { message });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;
