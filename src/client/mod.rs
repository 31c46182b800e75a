//! Shared JSON-over-HTTP client for the external services.
//!
//! Every stage of the pipeline talks to its service through a
//! [`ServiceClient`]. The client owns one pooled `reqwest::Client` and
//! applies a per-call timeout, so each stage can enforce its own bound.

pub mod error;

pub use error::ServiceError;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Thin wrapper over a shared HTTP client with uniform error mapping.
#[derive(Clone)]
pub struct ServiceClient {
    client: Arc<Client>,
}

impl ServiceClient {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Build a client with connection pooling suitable for the pipeline.
    pub fn pooled() -> Result<Self, ServiceError> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ServiceError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::new(Arc::new(client)))
    }

    /// POST `body` as JSON to `url` and decode a JSON answer.
    ///
    /// - `Err(ServiceError::Timeout)` if the call exceeded `timeout`
    /// - `Err(ServiceError::Network)` if the service is unreachable
    /// - `Err(ServiceError::Upstream)` for any non-2xx status
    /// - `Err(ServiceError::InvalidResponse)` if the body is not the expected JSON
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(timeout.as_millis() as u64)
            } else {
                ServiceError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
            }
        })
    }

    /// GET `url` and report only whether the service answered 2xx.
    pub async fn probe(&self, url: &str, timeout: Duration) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: format!("Health check failed: {}", status),
            })
        }
    }
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout(timeout.as_millis() as u64)
    } else {
        ServiceError::Network(e.to_string())
    }
}

/// Deserialize a reported cost, treating missing, null, negative or
/// non-finite values as zero.
pub fn deserialize_cost<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let cost = Option::<f64>::deserialize(deserializer)?;
    Ok(cost.filter(|c| c.is_finite() && *c > 0.0).unwrap_or(0.0))
}

/// Join a base URL and an endpoint path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::{json, Value};

    fn test_client() -> ServiceClient {
        ServiceClient::new(Arc::new(Client::new()))
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("http://localhost:8001", "/route"), "http://localhost:8001/route");
        assert_eq!(endpoint("http://localhost:8001/", "/route"), "http://localhost:8001/route");
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_body(mockito::Matcher::Json(json!({"question": "hola"})))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let body: Value = test_client()
            .post_json(
                &endpoint(&server.url(), "/echo"),
                &json!({"question": "hola"}),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_maps_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/echo")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let result: Result<Value, _> = test_client()
            .post_json(&endpoint(&server.url(), "/echo"), &json!({}), Duration::from_secs(5))
            .await;

        let err = result.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_post_json_invalid_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/echo")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result: Result<Value, _> = test_client()
            .post_json(&endpoint(&server.url(), "/echo"), &json!({}), Duration::from_secs(5))
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_post_json_connection_refused() {
        let result: Result<Value, _> = test_client()
            .post_json("http://127.0.0.1:1/route", &json!({}), Duration::from_secs(2))
            .await;

        assert!(matches!(result, Err(ServiceError::Network(_))));
    }

    #[tokio::test]
    async fn test_probe_unhealthy_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        let result = test_client()
            .probe(&endpoint(&server.url(), "/health"), Duration::from_secs(2))
            .await;

        assert_eq!(result.unwrap_err().status(), Some(503));
    }
}
