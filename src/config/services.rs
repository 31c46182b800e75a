//! Base URLs of the external services.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};

/// Where the router, the auditor/formatter, and each agent live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Classification service exposing `POST /route`
    pub router_url: String,
    /// Auditor service exposing `/audit`, `/audit-multi` and `/format`
    pub auditor_url: String,
    /// One base URL per specialist agent
    pub agents: AgentEndpoints,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            router_url: "http://localhost:8001".to_string(),
            auditor_url: "http://localhost:8005".to_string(),
            agents: AgentEndpoints::default(),
        }
    }
}

/// Statically configured base URL for every [`AgentId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentEndpoints {
    pub financial_regulator: String,
    pub trade_office: String,
    pub sanitary_office: String,
}

impl Default for AgentEndpoints {
    fn default() -> Self {
        Self {
            financial_regulator: "http://localhost:8002".to_string(),
            trade_office: "http://localhost:8003".to_string(),
            sanitary_office: "http://localhost:8004".to_string(),
        }
    }
}

impl AgentEndpoints {
    pub fn url(&self, id: AgentId) -> &str {
        match id {
            AgentId::FinancialRegulator => &self.financial_regulator,
            AgentId::TradeOffice => &self.trade_office,
            AgentId::SanitaryOffice => &self.sanitary_office,
        }
    }

    pub fn set_url(&mut self, id: AgentId, url: String) {
        match id {
            AgentId::FinancialRegulator => self.financial_regulator = url,
            AgentId::TradeOffice => self.trade_office = url,
            AgentId::SanitaryOffice => self.sanitary_office = url,
        }
    }
}
