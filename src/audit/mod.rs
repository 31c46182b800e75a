//! Audit/merge client.
//!
//! A single agent's answer is validated through `POST /audit`. When several
//! agents were consulted the merge endpoint `POST /audit-multi` is tried
//! first; only an HTTP 404 from it (the endpoint is not deployed yet) falls
//! back to auditing the primary agent's answer alone. Every other merge
//! failure is returned to the caller unchanged.

use crate::agent::{AgentId, AgentResponses};
use crate::client::{endpoint, ServiceClient, ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Output of the audit stage. The body is owned by the auditor and passed
/// through to the formatter untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub body: Value,
    pub cost: f64,
}

impl AuditResult {
    pub fn from_body(body: Value) -> Self {
        let cost = body
            .get("cost")
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite() && *c > 0.0)
            .unwrap_or(0.0);
        Self { body, cost }
    }
}

/// Which endpoint produced the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPath {
    /// `/audit` for a single consulted agent
    Single,
    /// `/audit-multi` over every agent's answer
    Merge,
    /// `/audit` over the primary agent after `/audit-multi` returned 404
    Fallback,
}

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub result: AuditResult,
    pub path: AuditPath,
}

#[derive(Serialize)]
struct SingleAuditRequest<'a> {
    user_question: &'a str,
    agent_response: &'a Value,
    agent_name: AgentId,
}

#[derive(Serialize)]
struct MergeAuditRequest<'a> {
    user_question: &'a str,
    agent_responses: &'a AgentResponses,
    primary_agent: AgentId,
}

/// Client for the auditor service.
pub struct AuditClient {
    audit_url: String,
    merge_url: String,
    client: ServiceClient,
    audit_timeout: Duration,
    merge_timeout: Duration,
}

impl AuditClient {
    pub fn new(
        base_url: &str,
        client: ServiceClient,
        audit_timeout: Duration,
        merge_timeout: Duration,
    ) -> Self {
        Self {
            audit_url: endpoint(base_url, "/audit"),
            merge_url: endpoint(base_url, "/audit-multi"),
            client,
            audit_timeout,
            merge_timeout,
        }
    }

    /// Audit the collected answers.
    ///
    /// With `is_multi` the merge endpoint is tried first and a 404 falls
    /// back to a single audit of `primary`. Without it, the sole entry of
    /// `responses` is audited directly.
    pub async fn audit(
        &self,
        question: &str,
        responses: &AgentResponses,
        primary: AgentId,
        is_multi: bool,
    ) -> Result<AuditOutcome, ServiceError> {
        if !is_multi {
            let agent = responses.keys().next().copied().unwrap_or(primary);
            let result = self.audit_single(question, responses, agent).await?;
            return Ok(AuditOutcome {
                result,
                path: AuditPath::Single,
            });
        }

        match self.audit_merge(question, responses, primary).await {
            Ok(result) => Ok(AuditOutcome {
                result,
                path: AuditPath::Merge,
            }),
            Err(e) if e.is_not_found() => {
                warn!(
                    primary_agent = %primary,
                    "Merge audit not available, auditing primary agent only"
                );
                metrics::counter!("oracle_audit_fallbacks_total").increment(1);
                let result = self.audit_single(question, responses, primary).await?;
                Ok(AuditOutcome {
                    result,
                    path: AuditPath::Fallback,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn audit_single(
        &self,
        question: &str,
        responses: &AgentResponses,
        agent: AgentId,
    ) -> Result<AuditResult, ServiceError> {
        let empty = json!({});
        let agent_response = responses.get(&agent).map(|r| &r.answer).unwrap_or(&empty);

        let body: Value = self
            .client
            .post_json(
                &self.audit_url,
                &SingleAuditRequest {
                    user_question: question,
                    agent_response,
                    agent_name: agent,
                },
                self.audit_timeout,
            )
            .await?;

        let result = AuditResult::from_body(body);
        info!(agent = %agent, cost = result.cost, "Audit completed");
        Ok(result)
    }

    async fn audit_merge(
        &self,
        question: &str,
        responses: &AgentResponses,
        primary: AgentId,
    ) -> Result<AuditResult, ServiceError> {
        let body: Value = self
            .client
            .post_json(
                &self.merge_url,
                &MergeAuditRequest {
                    user_question: question,
                    agent_responses: responses,
                    primary_agent: primary,
                },
                self.merge_timeout,
            )
            .await?;

        let result = AuditResult::from_body(body);
        info!(
            agents = responses.len(),
            primary_agent = %primary,
            cost = result.cost,
            "Merge audit completed"
        );
        Ok(result)
    }
}
