//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Helix API command-line client
#[derive(Parser, Debug)]
#[command(name = "helix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Application client id (overrides settings and HELIX_CLIENT_ID)
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// OAuth access token (overrides settings and HELIX_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL (overrides settings and HELIX_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request an endpoint and print each item
    Get {
        /// Endpoint path, e.g. `videos`
        endpoint: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Maximum number of pages to follow
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// Request an endpoint and print its rate-limit headers
    RateLimit {
        /// Endpoint path, e.g. `users`
        endpoint: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Single field: limit, remaining or reset
        #[arg(long)]
        key: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` argument
fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid parameter '{arg}', expected key=value")),
    }
}
