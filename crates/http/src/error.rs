//! Boundary errors and their mapping onto HTTP responses.
//!
//! Storage failures never surface as 5xx: they are logged with an error id and
//! downgraded to a bare `{"status": "failed"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::envelope::Envelope;

/// Message returned for requests no route matches
pub const ROUTE_NOT_FOUND: &str = "page is not found";

/// Errors a handler may return
#[derive(Error, Debug)]
pub enum ApiError {
    /// The addressed record does not exist
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The operation could not be completed; the cause is logged, not returned
    #[error(transparent)]
    Failed(#[from] anyhow::Error),

    #[error("{}", ROUTE_NOT_FOUND)]
    RouteNotFound,
}

impl ApiError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a failure from any error, keeping it only for logs
    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self::Failed(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound { message } => {
                let mut extra = Map::new();
                extra.insert("message".to_string(), Value::String(message));
                Envelope::failure_with(extra).into_response()
            }
            ApiError::Failed(cause) => {
                let error_id = Uuid::now_v7();
                tracing::error!(
                    error_id = %error_id,
                    cause = ?cause,
                    "request failed"
                );
                Envelope::failure().into_response()
            }
            ApiError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": ROUTE_NOT_FOUND })),
            )
                .into_response(),
        }
    }
}

/// Fallback handler for unmatched routes
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
