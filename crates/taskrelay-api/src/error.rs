//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskrelay_core::RelayError;
use thiserror::Error;
use tracing::error;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type. Every variant renders the same JSON envelope:
/// `{ "success": false, "error": "..." }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or payload content is unusable.
    #[error("{0}")]
    BadRequest(String),

    /// Signature missing or wrong.
    #[error("{0}")]
    Unauthorized(String),

    /// Anything other than POST on the webhook route.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// No route for the request path.
    #[error("not found")]
    NotFound,

    /// Deployment or downstream failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MalformedPayload(_) | RelayError::Validation(_) => {
                ApiError::BadRequest(err.to_string())
            }
            RelayError::SignatureMismatch => ApiError::Unauthorized(err.to_string()),
            RelayError::Configuration(_)
            | RelayError::Delivery { .. }
            | RelayError::Transport(_) => {
                error!(error = %err, retryable = err.is_retryable(), "Webhook relay failed");
                ApiError::Internal(err.to_string())
            }
        }
    }
}
