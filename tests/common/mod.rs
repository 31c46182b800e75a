//! Shared test utilities for oracle integration tests.
//!
//! Starts one wiremock server per external service and builds an
//! `OracleConfig` pointing at them.

#![allow(dead_code)]

use oracle::agent::AgentId;
use oracle::config::{AgentEndpoints, OracleConfig, ServicesConfig, TimeoutConfig};
use oracle::pipeline::Coordinator;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One mock server per service the pipeline talks to.
pub struct MockServices {
    pub router: MockServer,
    pub financial_regulator: MockServer,
    pub trade_office: MockServer,
    pub sanitary_office: MockServer,
    pub auditor: MockServer,
}

impl MockServices {
    pub async fn start() -> Self {
        Self {
            router: MockServer::start().await,
            financial_regulator: MockServer::start().await,
            trade_office: MockServer::start().await,
            sanitary_office: MockServer::start().await,
            auditor: MockServer::start().await,
        }
    }

    pub fn agent(&self, id: AgentId) -> &MockServer {
        match id {
            AgentId::FinancialRegulator => &self.financial_regulator,
            AgentId::TradeOffice => &self.trade_office,
            AgentId::SanitaryOffice => &self.sanitary_office,
        }
    }

    /// Config with short timeouts, pointing at the mock servers.
    pub fn config(&self) -> OracleConfig {
        OracleConfig {
            services: ServicesConfig {
                router_url: self.router.uri(),
                auditor_url: self.auditor.uri(),
                agents: AgentEndpoints {
                    financial_regulator: self.financial_regulator.uri(),
                    trade_office: self.trade_office.uri(),
                    sanitary_office: self.sanitary_office.uri(),
                },
            },
            timeouts: TimeoutConfig {
                router_ms: 2_000,
                agent_ms: 2_000,
                merge_audit_ms: 2_000,
                audit_ms: 2_000,
                formatter_ms: 2_000,
                health_ms: 1_000,
            },
            ..Default::default()
        }
    }

    pub fn coordinator(&self) -> Coordinator {
        Coordinator::new(&self.config()).unwrap()
    }

    /// `POST /route` answers `{decision, cost}`.
    pub async fn mount_route(&self, decision: Value, cost: f64) {
        Mock::given(method("POST"))
            .and(path("/route"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"decision": decision, "cost": cost})),
            )
            .mount(&self.router)
            .await;
    }

    /// `POST /answer` on one agent answers `{answer, cost}`.
    pub async fn mount_answer(&self, id: AgentId, answer: Value, cost: f64) {
        Mock::given(method("POST"))
            .and(path("/answer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": answer, "cost": cost})))
            .mount(self.agent(id))
            .await;
    }

    /// `POST /answer` on one agent answers after `delay`.
    pub async fn mount_slow_answer(&self, id: AgentId, cost: f64, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/answer"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"answer": {"text": "late"}, "cost": cost}))
                    .set_delay(delay),
            )
            .mount(self.agent(id))
            .await;
    }

    /// Fail the test if any of `ids` receives a call.
    pub async fn expect_no_answer(&self, ids: &[AgentId]) {
        for id in ids {
            Mock::given(method("POST"))
                .and(path("/answer"))
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(self.agent(*id))
                .await;
        }
    }

    /// `POST /format` answers `{markdown, cost}`; the cost must be ignored.
    pub async fn mount_format(&self, markdown: &str) {
        Mock::given(method("POST"))
            .and(path("/format"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"markdown": markdown, "cost": 100.0})),
            )
            .mount(&self.auditor)
            .await;
    }

    /// Number of requests a server received on `endpoint`.
    pub async fn calls(server: &MockServer, endpoint: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == endpoint)
            .count()
    }

    /// JSON body of the first request a server received on `endpoint`.
    pub async fn first_body(server: &MockServer, endpoint: &str) -> Value {
        let requests = server.received_requests().await.unwrap_or_default();
        let request = requests
            .iter()
            .find(|r| r.url.path() == endpoint)
            .unwrap_or_else(|| panic!("no request on {}", endpoint));
        serde_json::from_slice(&request.body).unwrap()
    }
}

/// Current-shape routing decision.
pub fn decision(agents: &[&str], primary: &str) -> Value {
    json!({
        "agents": agents,
        "primary_agent": primary,
        "confidence": 0.9,
        "reason": "test routing"
    })
}

/// An audit body with the given cost.
pub fn audit_body(verdict: &str, cost: f64) -> Value {
    json!({"verdict": verdict, "summary": "checked", "cost": cost})
}
