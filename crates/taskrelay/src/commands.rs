//! Command implementations.

use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use taskrelay_api::{serve, ApiConfig, AppState};
use taskrelay_core::pipeline::parse_body;
use taskrelay_core::{normalize, ConnectionProbe, Normalized, ProbeStatus, RelayConfig, RelayError};

use crate::cli::Commands;

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} of {1} connection checks failed")]
    ChecksFailed(usize, usize),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Builds the relay configuration from the environment plus overrides.
pub fn load_relay_config(mappings: Option<&Path>) -> Result<RelayConfig> {
    let mut config = RelayConfig::from_env();
    if let Some(path) = mappings {
        config = config.with_overrides_file(path)?;
        info!(path = %path.display(), "Loaded alias and mapping overrides");
    }

    for violation in config.mappings.round_trip_violations() {
        warn!(entry = %violation, "Mapping table does not round-trip");
    }
    Ok(config)
}

/// Executes a parsed command.
pub async fn execute(command: Commands, config: RelayConfig) -> Result<()> {
    match command {
        Commands::Serve { host, port } => run_serve(host, port, config).await,
        Commands::Normalize { file } => {
            let input = read_input(&file)?;
            println!("{}", normalize_payload(&input, &config)?);
            Ok(())
        }
        Commands::Check => run_check().await,
    }
}

async fn run_serve(host: String, port: u16, config: RelayConfig) -> Result<()> {
    if config.forward.endpoint.is_none() {
        warn!("N8N_WEBHOOK_URL is not set; completion events will fail with 500");
    }
    if config.webhook_secret.is_none() {
        warn!("NOTION_WEBHOOK_SECRET is not set; signature verification is disabled");
    }

    let api_config = ApiConfig::new(host, port);
    let state = AppState::new(api_config.clone(), config);
    serve(api_config, state).await?;
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}

/// Normalizes one payload and renders the result for display.
pub fn normalize_payload(input: &str, config: &RelayConfig) -> Result<String> {
    let raw = parse_body(input.as_bytes())?;
    match normalize(&raw, &config.aliases, &config.mappings)? {
        Normalized::Skipped => Ok("Not a project completion event, skipped".to_string()),
        Normalized::Record(record) => Ok(serde_json::to_string_pretty(&record)?),
    }
}

async fn run_check() -> Result<()> {
    let probe = ConnectionProbe::from_env()?;

    println!("Testing n8n API connection...");
    println!("  API URL: {}", probe.api_url());
    println!("  API key: {}", probe.masked_key());
    println!();

    let report = probe.run().await;
    for result in &report.results {
        let line = match &result.status {
            ProbeStatus::Ok { count } => format!("[ok]   {} ({} items)", result.check.label(), count),
            ProbeStatus::Forbidden => format!(
                "[warn] {}: access denied (normal for some API keys)",
                result.check.label()
            ),
            ProbeStatus::Failed { status, body } => {
                format!("[fail] {}: HTTP {} {}", result.check.label(), status, body)
            }
            ProbeStatus::Error(e) => format!("[fail] {}: {}", result.check.label(), e),
        };
        println!("{}", line);

        for (i, sample) in result.samples.iter().enumerate() {
            println!("         {}. {} (ID: {})", i + 1, sample.name, sample.id);
        }
    }

    let failed = report
        .results
        .iter()
        .filter(|r| !r.status.is_acceptable())
        .count();
    if failed > 0 {
        return Err(CliError::ChecksFailed(failed, report.results.len()));
    }

    println!();
    println!("All connection checks passed.");
    Ok(())
}
