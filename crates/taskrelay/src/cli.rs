//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskrelay - relay Notion completion webhooks to n8n
#[derive(Parser, Debug)]
#[command(name = "taskrelay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON file overriding field aliases and mapping tables
    #[arg(short, long, env = "TASKRELAY_MAPPINGS", global = true)]
    pub mappings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the webhook endpoint
    Serve {
        /// Host to bind to
        #[arg(long, env = "TASKRELAY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, env = "TASKRELAY_PORT", default_value = "8787")]
        port: u16,
    },

    /// Normalize a payload file without forwarding it ("-" reads stdin)
    Normalize {
        /// Path to a JSON webhook payload
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Check connectivity and permissions of the n8n API
    Check,
}

impl Cli {
    /// Returns the default tracing filter for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "taskrelay=info,taskrelay_api=info,taskrelay_core=info",
            1 => "taskrelay=debug,taskrelay_api=debug,taskrelay_core=debug,tower_http=debug",
            _ => "trace",
        }
    }
}
