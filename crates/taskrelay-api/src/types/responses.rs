//! Response DTOs for the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Successful webhook response.
///
/// Sent both when a record was forwarded and when the event was
/// skipped; `message` tells them apart.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    /// Always true.
    pub success: bool,
    /// What happened.
    pub message: String,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl WebhookResponse {
    /// Creates a successful response stamped with the current time.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
