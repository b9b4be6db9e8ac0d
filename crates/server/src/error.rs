//! Structured errors for the contact book HTTP handlers.
//!
//! Every error renders as `{"error": "<message>"}` with a matching status.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-level failures returned by the handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or empty required fields, or an unreadable body.
    #[error("malformed request")]
    MalformedRequest,

    /// The store reported a failure sentinel.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::MalformedRequest
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
