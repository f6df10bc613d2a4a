//! Error types for the edge cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache core and its HTTP surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Body exceeded the writer's maximum size, or the key is on the ignore list
    #[error("Entity too large: {0}")]
    EntityTooLarge(String),

    /// Operation the append-only writer does not implement
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Writer was already closed or discarded
    #[error("Writer already finished: {0}")]
    WriterClosed(String),

    /// Another writer is still open for the key
    #[error("Key is being written: {0}")]
    KeyIsWriting(String),

    /// Store has reached its memory capacity
    #[error("Not enough space: {0}")]
    NotEnoughSpace(String),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EntityTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::NotSupported(_) => StatusCode::NOT_IMPLEMENTED,
            CacheError::WriterClosed(_) => StatusCode::CONFLICT,
            CacheError::KeyIsWriting(_) => StatusCode::CONFLICT,
            CacheError::NotEnoughSpace(_) => StatusCode::INSUFFICIENT_STORAGE,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the edge cache.
pub type Result<T> = std::result::Result<T, CacheError>;
