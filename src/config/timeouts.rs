//! Per-stage timeouts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call bounds in milliseconds. There is no pipeline-wide deadline:
/// every stage enforces its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub router_ms: u64,
    /// Applied to each agent call independently, in parallel
    pub agent_ms: u64,
    pub merge_audit_ms: u64,
    pub audit_ms: u64,
    pub formatter_ms: u64,
    pub health_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            router_ms: 10_000,
            agent_ms: 35_000,
            merge_audit_ms: 45_000,
            audit_ms: 30_000,
            formatter_ms: 15_000,
            health_ms: 5_000,
        }
    }
}

impl TimeoutConfig {
    pub fn router(&self) -> Duration {
        Duration::from_millis(self.router_ms)
    }

    pub fn agent(&self) -> Duration {
        Duration::from_millis(self.agent_ms)
    }

    pub fn merge_audit(&self) -> Duration {
        Duration::from_millis(self.merge_audit_ms)
    }

    pub fn audit(&self) -> Duration {
        Duration::from_millis(self.audit_ms)
    }

    pub fn formatter(&self) -> Duration {
        Duration::from_millis(self.formatter_ms)
    }

    pub fn health(&self) -> Duration {
        Duration::from_millis(self.health_ms)
    }

    /// Field names and values, for validation.
    pub(crate) fn entries(&self) -> [(&'static str, u64); 6] {
        [
            ("timeouts.router_ms", self.router_ms),
            ("timeouts.agent_ms", self.agent_ms),
            ("timeouts.merge_audit_ms", self.merge_audit_ms),
            ("timeouts.audit_ms", self.audit_ms),
            ("timeouts.formatter_ms", self.formatter_ms),
            ("timeouts.health_ms", self.health_ms),
        ]
    }
}
