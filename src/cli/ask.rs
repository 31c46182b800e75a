//! Ask command: run one question in-process

use crate::cli::output::{format_progress, format_raw_flow, format_result};
use crate::cli::AskArgs;
use crate::config::{LogFormat, LoggingConfig};
use crate::logging::build_filter_directives;
use crate::pipeline::{Coordinator, PipelineResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for `oracle ask`: the `[logging]` section, with `--debug`
/// raising the base level.
fn ask_filter_directives(config: &LoggingConfig, debug: bool) -> String {
    if !debug {
        return build_filter_directives(config);
    }
    let mut config = config.clone();
    config.level = "debug".to_string();
    build_filter_directives(&config)
}

/// Logs go to stderr so stdout carries only the answer.
fn init_ask_tracing(config: &LoggingConfig, debug: bool) {
    let filter = ask_filter_directives(config, debug);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
}

/// Run the pipeline for `args.question`, printing progress to stderr
/// and the result to stdout.
pub async fn run_ask(args: AskArgs) -> Result<PipelineResult, Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;
    config.validate()?;

    init_ask_tracing(&config.logging, args.debug);

    let question = args.question.trim();
    if question.is_empty() {
        return Err("Question must not be empty".into());
    }

    let coordinator = Coordinator::new(&config)?;
    let quiet = args.json;
    let result = coordinator
        .run(question, |event| {
            if !quiet {
                eprintln!("{}", format_progress(&event));
            }
        })
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        eprintln!();
        print!("{}", format_result(&result));
        if args.debug {
            println!();
            println!("Raw flow:");
            println!("{}", format_raw_flow(&result)?);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_ask_filter_uses_logging_config() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            component_levels: Some(HashMap::from([(
                "audit".to_string(),
                "trace".to_string(),
            )])),
            ..Default::default()
        };

        assert_eq!(
            ask_filter_directives(&config, false),
            "warn,oracle::audit=trace"
        );
    }

    #[test]
    fn test_ask_debug_raises_base_level_only() {
        let config = LoggingConfig {
            level: "error".to_string(),
            component_levels: Some(HashMap::from([(
                "pipeline".to_string(),
                "trace".to_string(),
            )])),
            ..Default::default()
        };

        assert_eq!(
            ask_filter_directives(&config, true),
            "debug,oracle::pipeline=trace"
        );
        assert_eq!(config.level, "error");
    }
}
