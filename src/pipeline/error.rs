//! Stage failures and their caller-facing classification.

use crate::client::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Advisory returned when the router selects no agent.
pub const OUT_OF_SCOPE_MESSAGE: &str = "This question is outside the scope of the system. \
Please ask about regulations handled by the financial regulator, the trade office, \
or the sanitary office.";

/// Stages whose failure ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Router,
    Auditor,
    Formatter,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Router => "router",
            StageName::Auditor => "auditor",
            StageName::Formatter => "formatter",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A router, audit, or formatter call failed. Fatal for the run.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: StageName,
    #[source]
    pub source: ServiceError,
}

impl StageError {
    pub fn new(stage: StageName, source: ServiceError) -> Self {
        Self { stage, source }
    }

    pub fn kind(&self) -> FailureKind {
        FailureKind::classify(&self.source)
    }

    /// Message shown to the user in place of an answer.
    pub fn user_message(&self) -> String {
        let stage = self.stage;
        match (&self.source, self.kind()) {
            (ServiceError::Timeout(ms), _) => format!(
                "Error: the {} service did not respond within {}s. \
                 It may be busy with a complex question; please try again.",
                stage,
                ms.div_ceil(1000)
            ),
            (ServiceError::Upstream { status, .. }, FailureKind::Auth) => format!(
                "Error: the {} service rejected the request (HTTP {}). \
                 Check the service credentials.",
                stage, status
            ),
            (ServiceError::Upstream { status, .. }, _) => {
                format!("Error: the {} service failed (HTTP {}).", stage, status)
            }
            (ServiceError::Network(_), _) => format!(
                "Error: could not reach the {} service. Make sure all services are running.",
                stage
            ),
            (ServiceError::InvalidResponse(_), _) => format!(
                "Error: the {} service returned an unexpected response.",
                stage
            ),
        }
    }
}

/// Why a run ended with `success = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The router matched no agent; a valid classification, not a fault.
    OutOfScope,
    /// HTTP 401 or 403
    Auth,
    Timeout,
    Network,
    /// Any other non-2xx status
    Server,
    InvalidResponse,
}

impl FailureKind {
    pub fn classify(error: &ServiceError) -> Self {
        match error {
            ServiceError::Timeout(_) => FailureKind::Timeout,
            ServiceError::Network(_) => FailureKind::Network,
            ServiceError::Upstream { status: 401 | 403, .. } => FailureKind::Auth,
            ServiceError::Upstream { .. } => FailureKind::Server,
            ServiceError::InvalidResponse(_) => FailureKind::InvalidResponse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::OutOfScope => "out_of_scope",
            FailureKind::Auth => "auth",
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::Server => "server",
            FailureKind::InvalidResponse => "invalid_response",
        }
    }
}
