//! Application state shared across handlers.

use std::sync::Arc;

use taskrelay_core::{Forwarder, RelayConfig};

use crate::config::ApiConfig;

/// Application state shared across all handlers.
///
/// Read-only after construction; concurrent requests share nothing
/// mutable.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ApiConfig>,
    /// Relay configuration (secret, aliases, mappings, target).
    pub relay: Arc<RelayConfig>,
    /// Downstream client built from `relay.forward`.
    pub forwarder: Arc<Forwarder>,
}

impl AppState {
    /// Creates the state, deriving the forwarder from the relay target.
    pub fn new(config: ApiConfig, relay: RelayConfig) -> Self {
        let forwarder = Forwarder::new(relay.forward.clone());
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
            forwarder: Arc::new(forwarder),
        }
    }
}
