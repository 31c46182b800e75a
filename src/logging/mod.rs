//! Structured logging helpers for pipeline runs
//!
//! Filter construction for the tracing subscriber, run id generation and a
//! privacy-safe question preview.

pub mod fields;
pub mod run_id;

pub use fields::truncate_question;
pub use run_id::generate_run_id;

/// Build filter directives string from LoggingConfig
///
/// Starts from the base level and appends one `oracle::<component>=<level>`
/// directive per configured component.
///
/// # Examples
///
/// ```
/// use oracle::config::logging::{LogFormat, LoggingConfig};
/// use oracle::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("pipeline".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
///     enable_content_logging: false,
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,oracle::pipeline=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",oracle::{}={}", component, level));
        }
    }

    filter_str
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use std::collections::HashMap;

    #[test]
    fn test_filter_without_components() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "info");
    }

    #[test]
    fn test_filter_components_are_sorted() {
        let mut levels = HashMap::new();
        levels.insert("routing".to_string(), "trace".to_string());
        levels.insert("audit".to_string(), "debug".to_string());
        let config = LoggingConfig {
            level: "warn".to_string(),
            component_levels: Some(levels),
            ..Default::default()
        };

        assert_eq!(
            build_filter_directives(&config),
            "warn,oracle::audit=debug,oracle::routing=trace"
        );
    }
}
