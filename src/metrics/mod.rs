//! # Metrics Collection Module
//!
//! Prometheus export for the pipeline, served at `GET /metrics`.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `oracle_queries_total{outcome}` - Finished runs by outcome (`success` or a failure kind)
//! - `oracle_agent_calls_total{agent, status}` - Specialist agent calls
//! - `oracle_audit_fallbacks_total` - Merge audits retried as single audits after a 404
//!
//! **Histograms:**
//! - `oracle_stage_duration_seconds{stage}` - Time spent in router, agents, auditor, formatter
//! - `oracle_query_cost` - Total reported cost per run
//!
//! **Gauges:**
//! - `oracle_services_healthy` - Services that passed the last health check
//! - `oracle_uptime_seconds` - Seconds since the server started
//!
//! Recording through the `metrics` macros is a no-op until a recorder is
//! installed, so library and test use needs no setup.

pub mod handler;

pub use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::HealthReport;
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Instant;

/// Owns the Prometheus handle and the server start time.
pub struct MetricsCollector {
    start_time: Instant,
    prometheus_handle: PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(start_time: Instant, prometheus_handle: PrometheusHandle) -> Self {
        Self {
            start_time,
            prometheus_handle,
        }
    }

    /// Seconds since the server started.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Publish the outcome of a health check as gauges.
    pub fn record_health(&self, report: &HealthReport) {
        let healthy = report.services.values().filter(|s| s.healthy).count();
        metrics::gauge!("oracle_services_healthy").set(healthy as f64);
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        metrics::gauge!("oracle_uptime_seconds").set(self.uptime_seconds() as f64);
        self.prometheus_handle.render()
    }
}

/// Initialize the Prometheus exporter with pipeline-shaped buckets.
///
/// Stage durations span sub-second routing up to multi-minute merge audits.
/// Cost buckets are in the currency unit the services report.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let duration_buckets = &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0];
    let cost_buckets = &[0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("oracle_stage_duration_seconds".to_string()),
            duration_buckets,
        )?
        .set_buckets_for_metric(Matcher::Full("oracle_query_cost".to_string()), cost_buckets)?
        .install_recorder()?;

    Ok(handle)
}
