//! Service health probing.
//!
//! Issues `GET {base}/health` against the router, each specialist agent,
//! and the auditor concurrently. A service is up iff it answers 2xx within
//! the configured `health_ms`.

mod state;

pub use state::{HealthReport, ServiceHealth};

use crate::agent::AgentId;
use crate::client::{endpoint, ServiceClient, ServiceError};
use crate::config::{ServicesConfig, TimeoutConfig};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Probes every configured service on demand.
#[derive(Clone)]
pub struct HealthChecker {
    client: ServiceClient,
    targets: Vec<(String, String)>,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(client: ServiceClient, services: &ServicesConfig, timeouts: &TimeoutConfig) -> Self {
        let mut targets = vec![("router".to_string(), services.router_url.clone())];
        for id in AgentId::ALL {
            targets.push((id.as_str().to_string(), services.agents.url(id).to_string()));
        }
        targets.push(("auditor".to_string(), services.auditor_url.clone()));

        Self {
            client,
            targets,
            timeout: timeouts.health(),
        }
    }

    /// Names and base URLs that will be probed.
    pub fn targets(&self) -> &[(String, String)] {
        &self.targets
    }

    /// Probe all services at once and collect the results.
    pub async fn check_all(&self) -> HealthReport {
        let probes = self
            .targets
            .iter()
            .map(|(name, url)| async move { (name.clone(), self.check_one(url).await) });

        let services: BTreeMap<String, ServiceHealth> = join_all(probes).await.into_iter().collect();
        let report = HealthReport::from_services(services);

        if report.healthy {
            tracing::debug!("All services healthy");
        } else {
            tracing::warn!(
                unhealthy = report.unhealthy_count(),
                "Some services failed their health check"
            );
        }

        report
    }

    async fn check_one(&self, base_url: &str) -> ServiceHealth {
        let start = Instant::now();
        let result = self
            .client
            .probe(&endpoint(base_url, "/health"), self.timeout)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        ServiceHealth {
            url: base_url.to_string(),
            healthy: result.is_ok(),
            latency_ms,
            error: result.err().as_ref().map(ServiceError::to_string),
        }
    }
}
