//! # HTTP API
//!
//! Exposes the pipeline to browsers and other services.
//!
//! ## Endpoints
//!
//! - `POST /v1/query` - Run one question, return the `PipelineResult` as JSON
//! - `POST /v1/query/stream` - Same run as Server-Sent Events: `progress`
//!   events in pipeline order, then a single `result` event
//! - `GET /health` - Probe the router, agents, and auditor (200 or 503)
//! - `GET /metrics` - Prometheus text format
//!
//! ## Example
//!
//! ```no_run
//! use oracle::api::{create_router, AppState};
//! use oracle::config::OracleConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(OracleConfig::default());
//! let state = Arc::new(AppState::new(config)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only request validation produces an error envelope:
//! ```json
//! {
//!   "error": {
//!     "message": "Question must not be empty",
//!     "type": "invalid_request_error",
//!     "code": "invalid_request_error"
//!   }
//! }
//! ```
//! A pipeline that fails downstream still answers 200 with `success: false`.

mod health;
mod query;
pub mod types;

pub use types::*;

use crate::client::{ServiceClient, ServiceError};
use crate::config::OracleConfig;
use crate::health::HealthChecker;
use crate::metrics::MetricsCollector;
use crate::pipeline::Coordinator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<OracleConfig>,
    pub coordinator: Arc<Coordinator>,
    pub health: HealthChecker,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    /// Create application state; the coordinator and the health checker
    /// share one pooled HTTP client.
    pub fn new(config: Arc<OracleConfig>) -> Result<Self, ServiceError> {
        let client = ServiceClient::pooled()?;
        let start_time = Instant::now();

        // Safe to call more than once: later calls get a detached handle
        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            crate::metrics::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });

        Ok(Self {
            coordinator: Arc::new(Coordinator::with_client(&config, client.clone())),
            health: HealthChecker::new(client, &config.services, &config.timeouts),
            start_time,
            metrics_collector: Arc::new(MetricsCollector::new(start_time, prometheus_handle)),
            config,
        })
    }
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/v1/query", post(query::handle))
        .route("/v1/query/stream", post(query::handle_stream))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
