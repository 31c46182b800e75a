//! Error types for calls to the external services.

use thiserror::Error;

/// Errors that can occur when calling an external service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its per-call deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Service returned an error response (4xx, 5xx).
    #[error("Service error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body doesn't match the expected contract.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// HTTP status code, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True only for an HTTP 404 answer.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ServiceError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_only_for_404() {
        let not_found = ServiceError::Upstream {
            status: 404,
            message: "Not Found".to_string(),
        };
        let server = ServiceError::Upstream {
            status: 500,
            message: "boom".to_string(),
        };

        assert!(not_found.is_not_found());
        assert!(!server.is_not_found());
        assert!(!ServiceError::Network("refused".to_string()).is_not_found());
    }

    #[test]
    fn test_status_absent_for_transport_errors() {
        assert_eq!(ServiceError::Timeout(1000).status(), None);
        assert!(ServiceError::Timeout(1000).is_timeout());
        assert_eq!(
            ServiceError::InvalidResponse("bad json".to_string()).status(),
            None
        );
    }

    #[test]
    fn test_display_includes_status() {
        let err = ServiceError::Upstream {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Service error 503: unavailable");
    }
}
