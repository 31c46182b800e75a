//! Formatter client: renders an audited result into the final markdown.

use crate::audit::AuditResult;
use crate::client::{endpoint, ServiceClient, ServiceError};
use serde::Deserialize;
use std::time::Duration;

/// The rendered answer shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedArtifact {
    pub markdown: String,
}

#[derive(Deserialize)]
struct FormatResponse {
    markdown: String,
}

/// Client for `POST /format` on the auditor service.
///
/// Whatever cost the formatter reports is not read: formatting is
/// accounted as free.
pub struct FormatterClient {
    url: String,
    client: ServiceClient,
    timeout: Duration,
}

impl FormatterClient {
    pub fn new(base_url: &str, client: ServiceClient, timeout: Duration) -> Self {
        Self {
            url: endpoint(base_url, "/format"),
            client,
            timeout,
        }
    }

    /// Send the audit body as-is and return the rendered markdown.
    pub async fn format(&self, audit: &AuditResult) -> Result<FormattedArtifact, ServiceError> {
        let response: FormatResponse = self
            .client
            .post_json(&self.url, &audit.body, self.timeout)
            .await?;

        Ok(FormattedArtifact {
            markdown: response.markdown,
        })
    }
}
