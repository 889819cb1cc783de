//! Observability HTTP Routes
//!
//! Health check, engine counters and hazard reference provenance.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::observability::MetricsSnapshot;
use crate::reference::DatasetInfo;

use super::reconstruction_routes::{error_response, ApiState, ErrorResponse};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub reference_version: String,
}

/// Create observability routes
pub fn observability_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/reference", get(reference_handler))
        .route("/reference/reload", post(reload_reference_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        reference_version: state.service.reference_info().version,
    };

    (StatusCode::OK, Json(response))
}

async fn metrics_handler(State(state): State<Arc<ApiState>>) -> Json<MetricsSnapshot> {
    Json(state.service.metrics())
}

async fn reference_handler(State(state): State<Arc<ApiState>>) -> Json<DatasetInfo> {
    Json(state.service.reference_info())
}

async fn reload_reference_handler(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DatasetInfo>, (StatusCode, Json<ErrorResponse>)> {
    state
        .service
        .reload_reference(state.reference_path.as_deref())
        .map(Json)
        .map_err(error_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            reference_version: "2024.1".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
        assert!(json.contains("reference_version"));
    }
}
