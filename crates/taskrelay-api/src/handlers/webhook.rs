//! Webhook endpoint handler.
//!
//! Verifies, normalizes and forwards one inbound webhook per request.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use taskrelay_core::{relay, RelayOutcome, SIGNATURE_HEADER};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::WebhookResponse;

/// Message returned after a successful forward.
pub const PROCESSED_MESSAGE: &str = "Webhook processed successfully";

/// Message returned when the event is not a completion.
pub const SKIPPED_MESSAGE: &str = "Not a project completion event, skipped";

/// POST /webhook - Relay a webhook downstream.
///
/// # Response
///
/// - 200 OK: Record forwarded, or event skipped as non-completion
/// - 400 Bad Request: Invalid JSON or no resolvable project name
/// - 401 Unauthorized: Missing or invalid `x-notion-signature`
/// - 500 Internal Server Error: No endpoint configured or downstream failure
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>> {
    let request_id = Uuid::new_v4();
    let span = info_span!("webhook", request_id = %request_id);

    async move {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());

        debug!(
            bytes = body.len(),
            signed = signature.is_some(),
            "Received webhook"
        );

        let outcome = relay(&body, signature, &state.relay, &state.forwarder).await?;

        let message = match outcome {
            RelayOutcome::Skipped => SKIPPED_MESSAGE,
            RelayOutcome::Delivered { .. } => PROCESSED_MESSAGE,
        };
        Ok(Json(WebhookResponse::ok(message)))
    }
    .instrument(span)
    .await
}

/// Any non-POST method on /webhook.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Any path without a route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
