//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::config::ConfigError;
use crate::web::protocol::ErrorResponse;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The request itself is invalid.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The request body exceeded the configured upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A feature was requested whose configuration is missing.
    #[error("{0}")]
    NotConfigured(String),

    /// A catch-all for any other unexpected errors. `detail` is only filled in outside
    /// production.
    #[error("An unexpected internal error occurred: {message}")]
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::PayloadTooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message, None),
            ApiError::NotConfigured(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
            ApiError::Internal { message, detail } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, detail)
            }
            other => {
                error!("Unhandled error reached the HTTP layer: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            message,
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}
