//! Output formatting helpers for CLI commands

use crate::agent::AgentId;
use crate::health::HealthReport;
use crate::pipeline::{PipelineResult, ProgressEvent};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::fmt::Write;

/// Format a health report as a table
pub fn format_health_table(report: &HealthReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "URL", "Status", "Latency", "Error"]);

    for (name, service) in &report.services {
        let status_str = if service.healthy {
            "Healthy".green().to_string()
        } else {
            "Unhealthy".red().to_string()
        };

        table.add_row(vec![
            Cell::new(name),
            Cell::new(&service.url),
            Cell::new(status_str),
            Cell::new(format!("{}ms", service.latency_ms)),
            Cell::new(service.error.as_deref().unwrap_or("")),
        ]);
    }

    table.to_string()
}

/// Format a health report as JSON
pub fn format_health_json(report: &HealthReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// One live progress line, e.g. `→ [router] Analyzing question...`
pub fn format_progress(event: &ProgressEvent) -> String {
    format!(
        "{} [{}] {}",
        "→".cyan(),
        event.step.to_string().bold(),
        event.message
    )
}

/// Answer followed by the run summary.
pub fn format_result(result: &PipelineResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}", result.response);
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", "─".repeat(60).dimmed());

    let status = if result.success {
        "✓ Success".green()
    } else {
        "✗ Failed".red()
    };
    let _ = writeln!(output, "{}", status);
    let _ = writeln!(
        output,
        "Agents consulted: {}",
        format_agents(&result.agents_consulted)
    );
    let _ = writeln!(output, "Total cost: ${:.4}", result.total_cost);
    let _ = writeln!(output, "Duration: {:.1}s", result.duration_seconds);

    output
}

/// The raw payloads of every stage, pretty-printed.
pub fn format_raw_flow(result: &PipelineResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&result.raw_flow)
}

fn format_agents(agents: &[AgentId]) -> String {
    if agents.is_empty() {
        return "none".to_string();
    }
    agents
        .iter()
        .map(|a| a.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}
