//! Fan-out/fan-in dispatch of a question to the selected agents.

use super::{AgentId, AgentResponse, SpecialistAgent};
use crate::client::ServiceClient;
use crate::config::{ServicesConfig, TimeoutConfig};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, warn};

/// Answers keyed by agent. Once dispatch completes, every requested agent
/// has exactly one entry, successful or error-flagged.
pub type AgentResponses = BTreeMap<AgentId, AgentResponse>;

/// Invokes one or many specialist agents for a question.
pub struct AgentDispatcher {
    /// One client per agent, in `AgentId::ALL` order
    agents: [SpecialistAgent; 3],
}

impl AgentDispatcher {
    /// Create a dispatcher addressing every agent at its configured URL.
    pub fn new(client: ServiceClient, services: &ServicesConfig, timeouts: &TimeoutConfig) -> Self {
        let agents = AgentId::ALL.map(|id| {
            SpecialistAgent::new(
                services.agents.url(id).to_string(),
                client.clone(),
                timeouts.agent(),
            )
        });

        Self { agents }
    }

    fn agent(&self, id: AgentId) -> &SpecialistAgent {
        &self.agents[id.index()]
    }

    /// Base URL the dispatcher uses for `id`.
    pub fn agent_url(&self, id: AgentId) -> &str {
        self.agent(id).base_url()
    }

    /// Ask every agent in `agents` and wait for all of them to settle.
    ///
    /// Calls run concurrently, each bounded by its own timeout. A failure is
    /// recorded as an error-flagged [`AgentResponse`] for that agent only and
    /// never cancels a sibling call. The returned keys equal `agents`.
    pub async fn dispatch_all(&self, question: &str, agents: &[AgentId]) -> AgentResponses {
        let start = Instant::now();

        let results = join_all(agents.iter().map(|id| self.call_isolated(*id, question))).await;
        let responses: AgentResponses = results.into_iter().collect();

        let failed = responses.values().filter(|r| r.is_error()).count();
        info!(
            agents = agents.len(),
            failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Agent dispatch settled"
        );

        responses
    }

    async fn call_isolated(&self, id: AgentId, question: &str) -> (AgentId, AgentResponse) {
        let start = Instant::now();
        match self.agent(id).answer(question).await {
            Ok(response) => {
                metrics::counter!("oracle_agent_calls_total",
                    "agent" => id.as_str(),
                    "status" => "success"
                )
                .increment(1);
                info!(
                    agent = %id,
                    cost = response.cost,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Agent answered"
                );
                (id, response)
            }
            Err(e) => {
                metrics::counter!("oracle_agent_calls_total",
                    "agent" => id.as_str(),
                    "status" => "error"
                )
                .increment(1);
                warn!(
                    agent = %id,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Agent call failed, continuing without it"
                );
                (id, AgentResponse::failed(id, &e))
            }
        }
    }
}
