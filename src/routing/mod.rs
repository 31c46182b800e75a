//! Routing client: asks the classification service which agents apply.
//!
//! One `POST /route` call with a bounded timeout. Any failure is fatal for
//! the pipeline run; there is no fallback route.

pub mod decision;

pub use decision::{PrimaryAgent, RoutingDecision, WireDecision};

use crate::client::{deserialize_cost, endpoint, ServiceClient, ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct RouteRequest<'a> {
    question: &'a str,
}

/// Body of a `/route` answer.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub decision: WireDecision,
    #[serde(default, deserialize_with = "deserialize_cost")]
    pub cost: f64,
}

/// Normalized routing outcome plus what the stage cost.
#[derive(Debug, Clone)]
pub struct RoutedQuestion {
    pub decision: RoutingDecision,
    pub cost: f64,
    /// The router's response exactly as received
    pub raw: Value,
}

/// Client for the classification service.
pub struct RoutingClient {
    url: String,
    client: ServiceClient,
    timeout: Duration,
}

impl RoutingClient {
    pub fn new(base_url: &str, client: ServiceClient, timeout: Duration) -> Self {
        Self {
            url: endpoint(base_url, "/route"),
            client,
            timeout,
        }
    }

    /// Classify `question` and normalize the answer.
    pub async fn route(&self, question: &str) -> Result<RoutedQuestion, ServiceError> {
        let raw: Value = self
            .client
            .post_json(&self.url, &RouteRequest { question }, self.timeout)
            .await?;

        let parsed: RouteResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            ServiceError::InvalidResponse(format!("Failed to parse routing response: {}", e))
        })?;

        Ok(RoutedQuestion {
            decision: parsed.decision.normalize(),
            cost: parsed.cost,
            raw,
        })
    }
}
