//! Health report types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of probing one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub url: String,
    pub healthy: bool,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health of every service the pipeline depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Keyed by service name (`router`, `auditor`, agent ids)
    pub services: BTreeMap<String, ServiceHealth>,
    /// True only when every service answered 2xx
    pub healthy: bool,
}

impl HealthReport {
    pub fn from_services(services: BTreeMap<String, ServiceHealth>) -> Self {
        let healthy = services.values().all(|s| s.healthy);
        Self { services, healthy }
    }

    pub fn unhealthy_count(&self) -> usize {
        self.services.values().filter(|s| !s.healthy).count()
    }
}
