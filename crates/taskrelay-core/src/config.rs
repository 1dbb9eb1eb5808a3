//! Relay configuration.
//!
//! Everything the pipeline needs is carried in a [`RelayConfig`] and
//! passed explicitly; no component reads the process environment on its
//! own. [`RelayConfig::from_env`] is the one place that does.
//!
//! # Environment Variables
//!
//! - `N8N_WEBHOOK_URL`: Downstream endpoint (falls back to `N8N_URL`)
//! - `N8N_API_KEY`: Optional bearer credential for the endpoint
//! - `NOTION_WEBHOOK_SECRET`: Optional shared secret for signatures
//!
//! The connection probe additionally uses `N8N_API_URL`.

use std::path::Path;

use serde::Deserialize;

use crate::error::{RelayError, Result};
use crate::mapping::MappingTable;
use crate::normalizer::FieldAliases;

/// Environment variable for the downstream webhook endpoint.
pub const WEBHOOK_URL_ENV: &str = "N8N_WEBHOOK_URL";

/// Legacy name for the downstream endpoint.
pub const LEGACY_URL_ENV: &str = "N8N_URL";

/// Environment variable for the downstream API key.
pub const API_KEY_ENV: &str = "N8N_API_KEY";

/// Environment variable for the webhook signing secret.
pub const WEBHOOK_SECRET_ENV: &str = "NOTION_WEBHOOK_SECRET";

/// Environment variable for the n8n REST API base URL.
pub const API_URL_ENV: &str = "N8N_API_URL";

/// Where and how records are delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardTarget {
    /// Endpoint URL. `None` means forwarding is not configured.
    pub endpoint: Option<String>,
    /// Optional bearer credential.
    pub api_key: Option<String>,
}

impl ForwardTarget {
    /// Creates a target for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            api_key: None,
        }
    }

    /// Sets the bearer credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Complete configuration for one relay deployment.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Downstream target.
    pub forward: ForwardTarget,
    /// Signing secret. `None` disables signature verification.
    pub webhook_secret: Option<String>,
    /// Field alias lists.
    pub aliases: FieldAliases,
    /// Status/priority mapping tables.
    pub mappings: MappingTable,
}

impl RelayConfig {
    /// Creates a configuration with default aliases and mappings.
    pub fn new(forward: ForwardTarget) -> Self {
        Self {
            forward,
            ..Self::default()
        }
    }

    /// Reads the forward target and secret from the environment.
    ///
    /// Blank URLs and keys count as unset. The secret is only unset when
    /// it is empty; a whitespace-only secret still enforces signatures.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            forward: ForwardTarget {
                endpoint: get(WEBHOOK_URL_ENV).or_else(|| get(LEGACY_URL_ENV)),
                api_key: get(API_KEY_ENV),
            },
            webhook_secret: lookup(WEBHOOK_SECRET_ENV).filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }

    /// Sets the signing secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.webhook_secret = if secret.is_empty() { None } else { Some(secret) };
        self
    }

    /// Replaces aliases and mappings with those from a JSON overrides file.
    ///
    /// The file may contain `aliases` and/or `mappings` objects; any
    /// key left out keeps its default.
    ///
    /// # Errors
    /// Returns [`RelayError::Configuration`] if the file cannot be read
    /// or parsed.
    pub fn with_overrides_file(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let overrides: Overrides = serde_json::from_str(&content).map_err(|e| {
            RelayError::Configuration(format!("invalid overrides in {}: {}", path.display(), e))
        })?;

        if let Some(aliases) = overrides.aliases {
            self.aliases = aliases;
        }
        if let Some(mappings) = overrides.mappings {
            self.mappings = mappings;
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct Overrides {
    aliases: Option<FieldAliases>,
    mappings: Option<MappingTable>,
}
