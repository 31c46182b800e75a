//! `[logging]` section.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//! enable_content_logging = false
//!
//! [logging.component_levels]
//! pipeline = "debug"   # stage boundaries, costs, run outcome
//! audit = "trace"      # merge attempts and the 404 fallback
//! agent = "warn"       # only failed agent calls
//! ```

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Modules whose level can be set under `component_levels`.
pub const COMPONENTS: &[&str] = &[
    "agent", "api", "audit", "cli", "client", "format", "health", "pipeline", "routing",
];

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event, for log shipping
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for everything not listed in `component_levels`
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels, keyed by a name from [`COMPONENTS`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
    /// Log a truncated preview of each question. Questions may carry
    /// importer names, tax ids or amounts, so this stays off by default.
    pub enable_content_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
            enable_content_logging: false,
        }
    }
}

impl LoggingConfig {
    /// Reject unknown levels and component names before the subscriber
    /// is built; `EnvFilter` would otherwise drop them silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_level(&self.level) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("expected one of {}, got '{}'", LEVELS.join(", "), self.level),
            ));
        }

        if let Some(levels) = &self.component_levels {
            for (component, level) in levels {
                let field = format!("logging.component_levels.{}", component);
                if !COMPONENTS.contains(&component.as_str()) {
                    return Err(ConfigError::invalid(
                        field,
                        format!("unknown component, expected one of {}", COMPONENTS.join(", ")),
                    ));
                }
                if !is_level(level) {
                    return Err(ConfigError::invalid(field, format!("invalid level '{}'", level)));
                }
            }
        }

        Ok(())
    }
}

fn is_level(level: &str) -> bool {
    LEVELS.contains(&level.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_components(pairs: &[(&str, &str)]) -> LoggingConfig {
        LoggingConfig {
            component_levels: Some(
                pairs
                    .iter()
                    .map(|(c, l)| (c.to_string(), l.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.enable_content_logging);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_component_levels_from_toml() {
        let config: LoggingConfig = toml::from_str(
            r#"
            level = "warn"
            format = "json"
            [component_levels]
            pipeline = "debug"
            audit = "trace"
            "#,
        )
        .unwrap();

        assert_eq!(config.format, LogFormat::Json);
        let levels = config.component_levels.as_ref().unwrap();
        assert_eq!(levels.get("audit").map(String::as_str), Some("trace"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_rejects_unknown_component() {
        let err = with_components(&[("registry", "debug")])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("logging.component_levels.registry"));
    }

    #[test]
    fn test_validate_rejects_bad_component_level() {
        let err = with_components(&[("agent", "loud")]).validate().unwrap_err();
        assert!(err.to_string().contains("invalid level 'loud'"));
    }

    #[test]
    fn test_levels_are_case_insensitive() {
        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            ..with_components(&[("pipeline", "Trace")])
        };
        assert!(config.validate().is_ok());
    }
}
