//! Connectivity checks against the n8n REST API.
//!
//! Used by `taskrelay check` to confirm the API URL and key before the
//! relay is deployed. Three read-only endpoints are queried; each check
//! is reported independently so one failure does not hide the others.

use serde_json::Value;
use tracing::debug;

use crate::config::{API_KEY_ENV, API_URL_ENV};
use crate::error::{RelayError, Result};

/// Header n8n expects the API key in.
const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Number of sample workflows kept in the report.
const SAMPLE_LIMIT: usize = 3;

/// Which API capability a check exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeCheck {
    /// `GET /workflows`: basic connectivity.
    Workflows,
    /// `GET /credentials`: credential permissions.
    Credentials,
    /// `GET /executions`: execution history access.
    Executions,
}

impl ProbeCheck {
    pub const ALL: [ProbeCheck; 3] = [
        ProbeCheck::Workflows,
        ProbeCheck::Credentials,
        ProbeCheck::Executions,
    ];

    /// Path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ProbeCheck::Workflows => "/workflows",
            ProbeCheck::Credentials => "/credentials",
            ProbeCheck::Executions => "/executions",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeCheck::Workflows => "API connectivity",
            ProbeCheck::Credentials => "Credential permissions",
            ProbeCheck::Executions => "Execution access",
        }
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Request succeeded; `count` items in the response's `data` array.
    Ok { count: usize },
    /// 403: the key works but lacks this permission.
    Forbidden,
    /// Any other non-2xx response.
    Failed { status: u16, body: String },
    /// No response at all.
    Error(String),
}

impl ProbeStatus {
    /// True for outcomes that should not fail the overall check.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, ProbeStatus::Ok { .. } | ProbeStatus::Forbidden)
    }
}

/// A workflow listed by the connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSample {
    pub id: String,
    pub name: String,
}

/// Result of one check.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub check: ProbeCheck,
    pub status: ProbeStatus,
    /// Up to three workflows; only filled by [`ProbeCheck::Workflows`].
    pub samples: Vec<WorkflowSample>,
}

/// Report covering all checks.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    /// True if every check succeeded or was merely forbidden.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status.is_acceptable())
    }
}

/// Client for the n8n REST API checks.
#[derive(Debug, Clone)]
pub struct ConnectionProbe {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ConnectionProbe {
    /// Creates a probe for the given API base URL and key.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Builds a probe from `N8N_API_URL` and `N8N_API_KEY`.
    ///
    /// # Errors
    /// Returns [`RelayError::Configuration`] if either is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        match (get(API_URL_ENV), get(API_KEY_ENV)) {
            (Some(url), Some(key)) => Ok(Self::new(url, key)),
            _ => Err(RelayError::Configuration(format!(
                "missing {} or {}",
                API_URL_ENV, API_KEY_ENV
            ))),
        }
    }

    /// Reads the API URL and key from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Base URL the checks are issued against.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Key prefix safe to display.
    pub fn masked_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(8).collect();
        format!("{}...", prefix)
    }

    /// Runs every check in order.
    pub async fn run(&self) -> ProbeReport {
        let mut results = Vec::with_capacity(ProbeCheck::ALL.len());
        for check in ProbeCheck::ALL {
            results.push(self.check(check).await);
        }
        ProbeReport { results }
    }

    /// Runs a single check.
    pub async fn check(&self, check: ProbeCheck) -> ProbeResult {
        let url = format!("{}{}", self.api_url, check.path());
        debug!(check = ?check, url = %url, "Running connection check");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return result(check, ProbeStatus::Error(e.to_string())),
        };

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return result(check, ProbeStatus::Forbidden);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return result(
                check,
                ProbeStatus::Failed {
                    status: status.as_u16(),
                    body,
                },
            );
        }

        let json: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => return result(check, ProbeStatus::Error(e.to_string())),
        };
        let items = json
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let samples = match check {
            ProbeCheck::Workflows => items.iter().take(SAMPLE_LIMIT).map(sample).collect(),
            _ => Vec::new(),
        };

        ProbeResult {
            check,
            status: ProbeStatus::Ok { count: items.len() },
            samples,
        }
    }
}

fn result(check: ProbeCheck, status: ProbeStatus) -> ProbeResult {
    ProbeResult {
        check,
        status,
        samples: Vec::new(),
    }
}

fn sample(workflow: &Value) -> WorkflowSample {
    let field = |key: &str| match workflow.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    WorkflowSample {
        id: field("id"),
        name: field("name"),
    }
}
