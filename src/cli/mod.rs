//! CLI module for the regulatory oracle
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `ask` - Run one question through the pipeline and print the answer
//! - `serve` - Start the HTTP API
//! - `health` - Probe the router, agents, and auditor
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Ask a question against locally running services
//! oracle ask "What documents do I need to export honey?"
//!
//! # Check that every service is reachable
//! oracle health --json
//!
//! # Generate shell completions
//! oracle completions bash > ~/.bash_completion.d/oracle
//! ```

pub mod ask;
pub mod completions;
pub mod config;
pub mod health;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{ConfigError, OracleConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Regulatory Oracle - one audited answer from several specialist agents
#[derive(Parser, Debug)]
#[command(
    name = "oracle",
    version,
    about = "Routes regulatory questions to specialist agents and returns one audited answer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one question and print the answer
    Ask(AskArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Check that every service is reachable
    Health(HealthArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "oracle.toml")]
    pub config: PathBuf,

    /// Print the whole result as JSON instead of the rendered answer
    #[arg(long)]
    pub json: bool,

    /// Also print the raw routing, agent and audit payloads
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "oracle.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "ORACLE_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "ORACLE_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ORACLE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "oracle.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "oracle.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load the config file if it exists (defaults otherwise), then apply
/// `ORACLE_*` environment overrides.
pub fn load_config(path: &Path) -> Result<OracleConfig, ConfigError> {
    let config = if path.exists() {
        OracleConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        OracleConfig::default()
    };

    Ok(config.with_env_overrides())
}
