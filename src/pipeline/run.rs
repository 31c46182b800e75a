//! Per-invocation state and the terminal result built from it.

use super::error::{FailureKind, StageError, OUT_OF_SCOPE_MESSAGE};
use crate::agent::{AgentId, AgentResponses};
use crate::audit::{AuditOutcome, AuditPath};
use crate::routing::RoutingDecision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Routing,
    Dispatching,
    Auditing,
    Formatting,
    Done,
}

/// Everything the stages produced, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFlow {
    pub routing: Option<Value>,
    pub agents: AgentResponses,
    pub audit: Option<Value>,
    pub audit_path: Option<AuditPath>,
}

/// Terminal outcome of one run. Returned on every path, failures included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub success: bool,
    /// When the run was accepted, RFC 3339 on the wire
    pub started_at: DateTime<Utc>,
    /// Rendered answer, or a user-facing failure message
    pub response: String,
    /// Routing + agents + audit; the formatter is not counted
    pub total_cost: f64,
    pub duration_seconds: f64,
    pub agents_consulted: Vec<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub raw_flow: RawFlow,
}

/// State of a single invocation, owned by the coordinator until the
/// result is returned. Never shared between runs.
#[derive(Debug)]
pub struct PipelineRun {
    pub run_id: String,
    pub question: String,
    pub routing: Option<RoutingDecision>,
    pub raw_routing: Option<Value>,
    pub agent_responses: AgentResponses,
    pub audit: Option<AuditOutcome>,
    pub formatted: Option<String>,
    pub started_at: DateTime<Utc>,
    pub stage: RunStage,
    total_cost: f64,
    started: Instant,
}

impl PipelineRun {
    pub fn new(run_id: String, question: &str) -> Self {
        Self {
            run_id,
            question: question.to_string(),
            routing: None,
            raw_routing: None,
            agent_responses: AgentResponses::new(),
            audit: None,
            formatted: None,
            started_at: Utc::now(),
            stage: RunStage::Routing,
            total_cost: 0.0,
            started: Instant::now(),
        }
    }

    /// Add a stage cost. Costs are non-negative so the total only grows.
    pub fn add_cost(&mut self, cost: f64) {
        if cost.is_finite() && cost > 0.0 {
            self.total_cost += cost;
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn advance(&mut self, stage: RunStage) {
        self.stage = stage;
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Agents that were actually dispatched, in routing priority order.
    pub fn agents_consulted(&self) -> Vec<AgentId> {
        match &self.routing {
            Some(decision) => decision
                .agents
                .iter()
                .copied()
                .filter(|id| self.agent_responses.contains_key(id))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn into_success(mut self) -> PipelineResult {
        let response = self.formatted.take().unwrap_or_default();
        self.into_result(true, response, None)
    }

    pub fn into_out_of_scope(self) -> PipelineResult {
        self.into_result(
            false,
            OUT_OF_SCOPE_MESSAGE.to_string(),
            Some(FailureKind::OutOfScope),
        )
    }

    pub fn into_failure(self, error: &StageError) -> PipelineResult {
        self.into_result(false, error.user_message(), Some(error.kind()))
    }

    fn into_result(
        self,
        success: bool,
        response: String,
        failure: Option<FailureKind>,
    ) -> PipelineResult {
        let duration_seconds = self.elapsed_seconds();
        let agents_consulted = self.agents_consulted();
        let (audit, audit_path) = match self.audit {
            Some(outcome) => (Some(outcome.result.body), Some(outcome.path)),
            None => (None, None),
        };

        PipelineResult {
            success,
            started_at: self.started_at,
            response,
            total_cost: self.total_cost,
            duration_seconds,
            agents_consulted,
            failure,
            raw_flow: RawFlow {
                routing: self.raw_routing,
                agents: self.agent_responses,
                audit,
                audit_path,
            },
        }
    }
}
