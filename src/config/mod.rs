//! Configuration module for the oracle
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ORACLE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! The resulting [`OracleConfig`] is passed explicitly to the components
//! that need it; nothing reads the environment after startup.
//!
//! # Example
//!
//! ```rust
//! use oracle::config::OracleConfig;
//!
//! let config = OracleConfig::default();
//! assert_eq!(config.services.router_url, "http://localhost:8001");
//!
//! let toml = r#"
//! [timeouts]
//! router_ms = 2500
//! "#;
//! let config: OracleConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.timeouts.router_ms, 2500);
//! assert_eq!(config.timeouts.agent_ms, 35_000);
//! ```

pub mod error;
pub mod logging;
pub mod server;
pub mod services;
pub mod timeouts;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use services::{AgentEndpoints, ServicesConfig};
pub use timeouts::TimeoutConfig;

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration written by `oracle config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../oracle.example.toml");

/// Unified configuration for the oracle.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Base URLs of router, auditor and agents
    pub services: ServicesConfig,
    /// Per-stage call timeouts
    pub timeouts: TimeoutConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl OracleConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports ORACLE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("ORACLE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("ORACLE_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("ORACLE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ORACLE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(url) = std::env::var("ORACLE_ROUTER_URL") {
            self.services.router_url = url;
        }
        if let Ok(url) = std::env::var("ORACLE_AUDITOR_URL") {
            self.services.auditor_url = url;
        }
        for id in AgentId::ALL {
            if let Ok(url) = std::env::var(agent_url_env_var(id)) {
                self.services.agents.set_url(id, url);
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }

        validate_url("services.router_url", &self.services.router_url)?;
        validate_url("services.auditor_url", &self.services.auditor_url)?;
        for id in AgentId::ALL {
            let field = format!("services.agents.{}", id.as_str().replace('-', "_"));
            validate_url(&field, self.services.agents.url(id))?;
        }

        for (field, value) in self.timeouts.entries() {
            if value == 0 {
                return Err(ConfigError::invalid(field, "timeout must be non-zero"));
            }
        }

        self.logging.validate()
    }
}

/// Environment variable overriding the base URL of `id`.
pub fn agent_url_env_var(id: AgentId) -> String {
    format!(
        "ORACLE_{}_URL",
        id.as_str().replace('-', "_").to_uppercase()
    )
}

fn validate_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::invalid(field, "URL cannot be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::invalid(
            field,
            format!("URL must start with http:// or https:// (got '{}')", url),
        ));
    }
    Ok(())
}
