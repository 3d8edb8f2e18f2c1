//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error; it surfaces as an empty value.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Operation is part of the public contract but not provided
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Persistent store failure, propagated as-is
    #[error("Store error: {0}")]
    Store(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Store(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            CacheError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
