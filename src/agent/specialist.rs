//! HTTP client for a single specialist agent.

use super::AgentResponse;
use crate::client::{endpoint, ServiceClient, ServiceError};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct AnswerRequest<'a> {
    question: &'a str,
}

/// One specialist service reachable at `POST {base_url}/answer`.
#[derive(Clone)]
pub struct SpecialistAgent {
    base_url: String,
    client: ServiceClient,
    timeout: Duration,
}

impl SpecialistAgent {
    pub fn new(base_url: String, client: ServiceClient, timeout: Duration) -> Self {
        Self {
            base_url,
            client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask this agent the question.
    ///
    /// Any failure (network, timeout, non-2xx, unreadable body) is returned
    /// as an error; isolating it from sibling calls is the dispatcher's job.
    pub async fn answer(&self, question: &str) -> Result<AgentResponse, ServiceError> {
        let url = endpoint(&self.base_url, "/answer");
        self.client
            .post_json(&url, &AnswerRequest { question }, self.timeout)
            .await
    }
}
