//! Taskrelay CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use taskrelay::cli::Cli;
use taskrelay::commands;

#[tokio::main]
async fn main() {
    // Load .env.local / .env if present (N8N_WEBHOOK_URL, secrets, ...)
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    fmt().with_env_filter(filter).with_target(false).init();

    let result = match commands::load_relay_config(cli.mappings.as_deref()) {
        Ok(config) => commands::execute(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
