//! Taskrelay Core - webhook normalization between Notion, Linear and n8n.
//!
//! This crate holds the transformation and decision logic that sits
//! between receipt of a raw webhook and emission of a normalized event:
//!
//! - **signature**: HMAC-SHA256 verification of inbound bodies
//! - **extractor**: alias-tolerant property extraction
//! - **classifier**: completion-event detection across payload shapes
//! - **normalizer**: canonical record construction with defaults
//! - **mapping**: Linear/Notion status and priority tables
//! - **forwarder**: delivery of records to the downstream webhook
//! - **pipeline**: the above, composed for one request
//! - **probe**: n8n API connectivity checks
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use taskrelay_core::{normalize, FieldAliases, MappingTable, Normalized};
//!
//! let raw = json!({
//!     "properties": {
//!         "Status": { "select": { "name": "Done" } },
//!         "Name": { "title": [{ "plain_text": "Launch" }] }
//!     }
//! });
//!
//! let result = normalize(&raw, &FieldAliases::default(), &MappingTable::default()).unwrap();
//! match result {
//!     Normalized::Record(record) => assert_eq!(record.project_name, "Launch"),
//!     Normalized::Skipped => unreachable!(),
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod forwarder;
pub mod mapping;
pub mod normalizer;
pub mod pipeline;
pub mod probe;
pub mod record;
pub mod signature;

#[cfg(test)]
mod test_utils;

pub use classifier::{completion_shape, is_completion_event, PayloadShape};
pub use config::{ForwardTarget, RelayConfig};
pub use error::{RelayError, Result};
pub use extractor::{extract_date, extract_multi, extract_select, extract_text, PropertyBag};
pub use forwarder::{DeliveryResult, Forwarder};
pub use mapping::MappingTable;
pub use normalizer::{normalize, normalize_on, FieldAliases, Normalized};
pub use pipeline::{relay, RelayOutcome};
pub use probe::{ConnectionProbe, ProbeCheck, ProbeReport, ProbeStatus};
pub use record::{CanonicalRecord, Priority};
pub use signature::{compute_signature, verify_signature, SIGNATURE_HEADER};
