//! Error types for the relay pipeline.

use thiserror::Error;

/// Errors that can occur while relaying a webhook.
///
/// A skipped (non-completion) event is not an error; see
/// [`crate::pipeline::RelayOutcome::Skipped`].
#[derive(Error, Debug)]
pub enum RelayError {
    /// Request body is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    MalformedPayload(String),

    /// Signature header missing or not matching the body.
    #[error("invalid signature")]
    SignatureMismatch,

    /// Payload parsed but could not be normalized.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Deployment is missing something it needs (endpoint, credentials).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Downstream answered with a non-2xx status.
    #[error("downstream returned {status}: {body}")]
    Delivery {
        /// HTTP status code returned downstream.
        status: u16,
        /// Response body, kept for diagnosis.
        body: String,
    },

    /// Request never produced a response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Substrings that mark an error message as transient.
const RETRYABLE_KEYWORDS: &[&str] = &["timeout", "network", "rate limit"];

/// Downstream statuses worth retrying.
const RETRYABLE_STATUSES: &[u16] = &[500, 502, 503];

impl RelayError {
    /// Returns true if a caller-side retry could succeed.
    ///
    /// The pipeline itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            RelayError::Transport(_) => true,
            RelayError::Delivery { status, body } => {
                RETRYABLE_STATUSES.contains(status) || mentions_transient(body)
            }
            RelayError::MalformedPayload(_)
            | RelayError::SignatureMismatch
            | RelayError::Validation(_)
            | RelayError::Configuration(_) => false,
        }
    }
}

fn mentions_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    RETRYABLE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::MalformedPayload(err.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}
