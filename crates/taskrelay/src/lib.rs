//! Taskrelay command-line application.
//!
//! Runs the webhook endpoint, normalizes payload files offline and
//! checks n8n API connectivity.

pub mod cli;
pub mod commands;
