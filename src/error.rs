//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::services::images::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur while handling a request are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Create was called without a file attachment
    #[error("no file")]
    MissingFile,

    /// The attached file is not a JPEG or PNG image
    #[error("bad mime type")]
    UnsupportedMediaType(Option<String>),

    /// Product with the given ID was not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Request origin is not on the allow-list
    #[error("Origin not allowed: {0}")]
    OriginRejected(String),

    /// Multipart form could not be read
    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    /// Uploaded file exceeds the configured size limit
    #[error("Upload exceeds maximum size of {0} bytes")]
    PayloadTooLarge(u64),

    /// Error occurred while reading or writing the image store
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            AppError::OriginRejected(_) => StatusCode::FORBIDDEN,
            AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        match self {
            // Existing clients display these bodies verbatim
            AppError::MissingFile | AppError::UnsupportedMediaType(_) => {
                (status, self.to_string()).into_response()
            }
            AppError::ProductNotFound(_) => status.into_response(),
            _ => {
                let body = Json(json!({
                    "error": self.to_string(),
                    "status": status.as_u16(),
                }));
                (status, body).into_response()
            }
        }
    }
}
