//! Progress events emitted while a run advances.
//!
//! Allowed order: `router` (one or two events) → `agents` or the single
//! agent's id → `auditor` → `complete`. A run that stops early simply
//! emits no further events.

use crate::agent::AgentId;
use crate::routing::RoutingDecision;
use serde::Serialize;
use std::fmt;

/// Checkpoint a progress event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ProgressStep {
    Router,
    /// Several agents are being consulted in parallel
    Agents,
    /// Exactly one agent is being consulted
    Agent(AgentId),
    Auditor,
    Complete,
}

impl ProgressStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStep::Router => "router",
            ProgressStep::Agents => "agents",
            ProgressStep::Agent(id) => id.as_str(),
            ProgressStep::Auditor => "auditor",
            ProgressStep::Complete => "complete",
        }
    }

    /// Position in the pipeline; both agent variants share one slot.
    pub fn order(&self) -> u8 {
        match self {
            ProgressStep::Router => 0,
            ProgressStep::Agents | ProgressStep::Agent(_) => 1,
            ProgressStep::Auditor => 2,
            ProgressStep::Complete => 3,
        }
    }
}

impl fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProgressStep> for String {
    fn from(step: ProgressStep) -> Self {
        step.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    /// Best-known routing decision, once the router has answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingDecision>,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(step: ProgressStep, routing: Option<&RoutingDecision>, message: impl Into<String>) -> Self {
        Self {
            step,
            routing: routing.cloned(),
            message: message.into(),
        }
    }
}

/// Human-readable summary of where a routing decision sends the question.
pub(crate) fn routing_message(decision: &RoutingDecision) -> String {
    if decision.is_out_of_scope() {
        return "Question is out of scope".to_string();
    }
    if decision.is_multi() {
        let names: Vec<String> = decision
            .agents
            .iter()
            .map(|a| a.as_str().to_uppercase())
            .collect();
        format!(
            "Routing to {} agents: {}...",
            decision.agents.len(),
            names.join(", ")
        )
    } else {
        format!("Routing to {}...", decision.primary_agent.as_str().to_uppercase())
    }
}
