//! Agent identity and answer types shared across the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// One of the fixed specialist services.
///
/// The set is closed: the router can only select among these three, and
/// each one is addressed by a statically configured base URL. The legacy
/// short names used by the deployed router are accepted as aliases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AgentId {
    #[serde(rename = "financial-regulator", alias = "bcra")]
    FinancialRegulator,
    #[serde(rename = "trade-office", alias = "comex")]
    TradeOffice,
    #[serde(rename = "sanitary-office", alias = "senasa")]
    SanitaryOffice,
}

impl AgentId {
    pub const ALL: [AgentId; 3] = [
        AgentId::FinancialRegulator,
        AgentId::TradeOffice,
        AgentId::SanitaryOffice,
    ];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::FinancialRegulator => "financial-regulator",
            AgentId::TradeOffice => "trade-office",
            AgentId::SanitaryOffice => "sanitary-office",
        }
    }

    /// Position in [`AgentId::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AgentId::FinancialRegulator => 0,
            AgentId::TradeOffice => 1,
            AgentId::SanitaryOffice => 2,
        }
    }

    /// Human-readable label for progress messages and CLI output.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentId::FinancialRegulator => "Financial Regulator",
            AgentId::TradeOffice => "Trade Office",
            AgentId::SanitaryOffice => "Sanitary Office",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "financial-regulator" | "bcra" => Ok(AgentId::FinancialRegulator),
            "trade-office" | "comex" => Ok(AgentId::TradeOffice),
            "sanitary-office" | "senasa" => Ok(AgentId::SanitaryOffice),
            _ => Err(format!("Unknown agent: {}", s)),
        }
    }
}

/// One specialist's answer.
///
/// `answer` is opaque to the pipeline and passed through to the auditor.
/// A failed dispatch is still an `AgentResponse`: its answer is
/// `{"error": <reason>}` and its cost is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub answer: Value,
    #[serde(default, deserialize_with = "crate::client::deserialize_cost")]
    pub cost: f64,
    /// Any additional fields the agent reported, kept for the auditor.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentResponse {
    /// Build the error-flagged entry recorded for a failed agent call.
    ///
    /// The entry carries only `answer` and `cost`; the reason names the
    /// agent so the auditor can attribute it.
    pub fn failed(agent: AgentId, reason: impl fmt::Display) -> Self {
        Self {
            answer: json!({ "error": format!("{} unavailable: {}", agent, reason) }),
            cost: 0.0,
            extra: Map::new(),
        }
    }

    /// The error indicator, if this entry records a failed call.
    pub fn error(&self) -> Option<&str> {
        self.answer.get("error").and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}
