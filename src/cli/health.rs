//! Health command implementation

use crate::cli::output::{format_health_json, format_health_table};
use crate::cli::HealthArgs;
use crate::client::ServiceClient;
use crate::config::OracleConfig;
use crate::health::{HealthChecker, HealthReport};
use colored::Colorize;

/// Probe every configured service once.
pub async fn check_services(config: &OracleConfig) -> Result<HealthReport, Box<dyn std::error::Error>> {
    let checker = HealthChecker::new(ServiceClient::pooled()?, &config.services, &config.timeouts);
    Ok(checker.check_all().await)
}

/// Render a report the way `oracle health` prints it.
pub fn render_health(args: &HealthArgs, report: &HealthReport) -> Result<String, Box<dyn std::error::Error>> {
    if args.json {
        return Ok(format_health_json(report)?);
    }

    let healthy = report.services.len() - report.unhealthy_count();
    let status = if report.healthy {
        "Healthy".green()
    } else {
        "Degraded".yellow()
    };

    Ok(format!(
        "Status: {}\nServices: {}/{} healthy\n\n{}",
        status,
        healthy,
        report.services.len(),
        format_health_table(report)
    ))
}

/// Handle health command; returns the output and whether every service is up
pub async fn handle_health(args: &HealthArgs) -> Result<(String, bool), Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;
    config.validate()?;

    let report = check_services(&config).await?;
    Ok((render_health(args, &report)?, report.healthy))
}
