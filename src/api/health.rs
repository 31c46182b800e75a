//! Health check endpoint handler.

use crate::api::AppState;
use crate::health::HealthReport;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// GET /health - Probe every service; 503 unless all are up.
pub async fn handle(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.check_all().await;
    state.metrics_collector.record_health(&report);

    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
