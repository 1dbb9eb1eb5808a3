//! HTTP surface for Taskrelay.
//!
//! This crate exposes the relay pipeline over HTTP:
//! - `POST /webhook`: verify, normalize and forward one webhook
//! - `GET /api/health`: liveness and version
//!
//! Every error leaves as `{ "success": false, "error": "..." }`.
//!
//! # Example
//!
//! ```ignore
//! use taskrelay_api::{ApiConfig, AppState, serve};
//! use taskrelay_core::RelayConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(ApiConfig::default(), RelayConfig::from_env());
//!     serve(ApiConfig::default(), state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
