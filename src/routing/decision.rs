//! Routing decision types and wire-shape normalization.
//!
//! The router has answered in two shapes over time:
//!
//! - legacy: `{"agent": "trade-office", "confidence": .., "reason": ..}`
//! - current: `{"agents": [..], "primary_agent": "..", "confidence": .., "reason": ..}`
//!
//! Both are parsed into [`WireDecision`] and normalized into one
//! [`RoutingDecision`] here. Nothing downstream looks at the wire shape.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

const OUT_OF_SCOPE: &str = "out_of_scope";

/// The agent whose answer leads the audit, or the out-of-scope verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PrimaryAgent {
    Agent(AgentId),
    OutOfScope,
}

impl PrimaryAgent {
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            PrimaryAgent::Agent(id) => Some(*id),
            PrimaryAgent::OutOfScope => None,
        }
    }

    pub fn is_out_of_scope(&self) -> bool {
        matches!(self, PrimaryAgent::OutOfScope)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryAgent::Agent(id) => id.as_str(),
            PrimaryAgent::OutOfScope => OUT_OF_SCOPE,
        }
    }
}

impl fmt::Display for PrimaryAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PrimaryAgent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match RouteTarget::parse(&value) {
            RouteTarget::Agent(id) => Ok(PrimaryAgent::Agent(id)),
            RouteTarget::OutOfScope => Ok(PrimaryAgent::OutOfScope),
            RouteTarget::Unknown => Err(format!("Unknown primary agent: {}", value)),
        }
    }
}

impl From<PrimaryAgent> for String {
    fn from(value: PrimaryAgent) -> Self {
        value.as_str().to_string()
    }
}

/// Canonical result of the routing stage.
///
/// Invariant: when `agents` is empty, `primary_agent` is `OutOfScope`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Unique agents, in consultation priority order
    pub agents: Vec<AgentId>,
    pub primary_agent: PrimaryAgent,
    /// In `[0, 1]`
    pub confidence: f64,
    pub reason: String,
}

impl RoutingDecision {
    /// True when the pipeline must stop after routing.
    pub fn is_out_of_scope(&self) -> bool {
        self.agents.is_empty() || self.primary_agent.is_out_of_scope()
    }

    /// True when more than one agent is consulted.
    pub fn is_multi(&self) -> bool {
        self.agents.len() > 1
    }
}

/// The router's `decision` object, in either historical shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireDecision {
    Current(CurrentDecision),
    Legacy(LegacyDecision),
}

/// Multi-agent shape: an explicit `agents` array.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentDecision {
    pub agents: Vec<String>,
    #[serde(default)]
    pub primary_agent: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Single-agent shape: one `agent` field.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDecision {
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub primary_agent: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

enum RouteTarget {
    Agent(AgentId),
    OutOfScope,
    Unknown,
}

impl RouteTarget {
    fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace('-', "_");
        if normalized == OUT_OF_SCOPE {
            return RouteTarget::OutOfScope;
        }
        match raw.parse::<AgentId>() {
            Ok(id) => RouteTarget::Agent(id),
            Err(_) => RouteTarget::Unknown,
        }
    }
}

impl WireDecision {
    /// Normalize either shape into a [`RoutingDecision`].
    ///
    /// `agents` is the explicit `agents` array if present, else the
    /// singleton of `agent` if present, else empty. `primary_agent` follows
    /// `primary_agent` > `agent` > out-of-scope. Strings that are not a known
    /// agent are dropped; duplicates keep their first position.
    pub fn normalize(self) -> RoutingDecision {
        let (agents, primary, agent, confidence, reason) = match self {
            WireDecision::Current(d) => {
                (d.agents, d.primary_agent, d.agent, d.confidence, d.reason)
            }
            WireDecision::Legacy(d) => {
                let agents: Vec<String> = d.agent.iter().cloned().collect();
                (agents, d.primary_agent, d.agent, d.confidence, d.reason)
            }
        };

        let mut selected: Vec<AgentId> = Vec::with_capacity(agents.len());
        for raw in &agents {
            match RouteTarget::parse(raw) {
                RouteTarget::Agent(id) => {
                    if !selected.contains(&id) {
                        selected.push(id);
                    }
                }
                RouteTarget::OutOfScope => {}
                RouteTarget::Unknown => {
                    warn!(agent = %raw, "Router selected an unknown agent, ignoring it");
                }
            }
        }

        let primary_agent = primary
            .iter()
            .chain(agent.iter())
            .find_map(|raw| match RouteTarget::parse(raw) {
                RouteTarget::Agent(id) => Some(PrimaryAgent::Agent(id)),
                RouteTarget::OutOfScope => Some(PrimaryAgent::OutOfScope),
                RouteTarget::Unknown => None,
            })
            .unwrap_or(PrimaryAgent::OutOfScope);

        let primary_agent = if selected.is_empty() {
            PrimaryAgent::OutOfScope
        } else {
            primary_agent
        };

        RoutingDecision {
            agents: selected,
            primary_agent,
            confidence: confidence
                .filter(|c| c.is_finite())
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(0.0),
            reason: reason.unwrap_or_default(),
        }
    }
}
