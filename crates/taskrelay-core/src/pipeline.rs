//! End-to-end handling of one inbound webhook.
//!
//! signature -> parse -> classify/normalize -> forward. Each call is
//! independent; nothing is shared between requests except the
//! read-only configuration and the HTTP client. A record is forwarded
//! only after every earlier step has succeeded.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::forwarder::{DeliveryResult, Forwarder};
use crate::normalizer::{normalize, Normalized};
use crate::record::CanonicalRecord;
use crate::signature::verify_signature;

/// Terminal outcome of a successfully handled webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Not a completion event. Nothing was forwarded.
    Skipped,
    /// Record was accepted downstream.
    Delivered {
        record: CanonicalRecord,
        delivery: DeliveryResult,
    },
}

/// Checks the signature header when a secret is configured.
///
/// With no secret configured, every request passes.
///
/// # Errors
/// Returns [`RelayError::SignatureMismatch`] if the header is missing or
/// does not match.
pub fn authenticate(body: &[u8], signature: Option<&str>, secret: Option<&str>) -> Result<()> {
    let Some(secret) = secret else {
        return Ok(());
    };

    match signature {
        Some(sig) if verify_signature(body, sig, secret.as_bytes()) => Ok(()),
        Some(_) => {
            warn!("Webhook signature mismatch");
            Err(RelayError::SignatureMismatch)
        }
        None => {
            warn!("Webhook signature missing");
            Err(RelayError::SignatureMismatch)
        }
    }
}

/// Parses a request body as JSON.
pub fn parse_body(body: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(body)?)
}

/// Runs the full pipeline for one request.
pub async fn relay(
    body: &[u8],
    signature: Option<&str>,
    config: &RelayConfig,
    forwarder: &Forwarder,
) -> Result<RelayOutcome> {
    authenticate(body, signature, config.webhook_secret.as_deref())?;

    let raw = parse_body(body)?;
    let source_id = raw.get("id").and_then(Value::as_str).unwrap_or_default();

    let record = match normalize(&raw, &config.aliases, &config.mappings)? {
        Normalized::Skipped => {
            info!(source_id = %source_id, "Not a project completion event, skipping");
            return Ok(RelayOutcome::Skipped);
        }
        Normalized::Record(record) => record,
    };
    debug!(
        source_id = %source_id,
        project_name = %record.project_name,
        "Normalized completion event"
    );

    let delivery = forwarder.forward(&record).await?;
    info!(
        source_id = %source_id,
        project_name = %record.project_name,
        downstream_status = delivery.status,
        "Webhook processed"
    );

    Ok(RelayOutcome::Delivered { record, delivery })
}
