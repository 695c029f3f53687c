//! Health check and metrics endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (pings the store)
//! - /health/live - Liveness probe (always OK while the server runs)
//! - /metrics - Prometheus exposition, when a recorder is installed

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn response(status: &str, checks: Option<HealthChecks>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    })
}

/// Probe and metrics routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
        .route("/metrics", get(metrics))
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    response("healthy", None)
}

/// Readiness probe; 503 while the store is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match state.users.ping().await {
        Ok(()) => Ok(response(
            "ready",
            Some(HealthChecks {
                store: CheckStatus {
                    status: "healthy".to_string(),
                    message: None,
                },
            }),
        )),
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                response(
                    "not_ready",
                    Some(HealthChecks {
                        store: CheckStatus {
                            status: "unhealthy".to_string(),
                            message: Some(e.to_string()),
                        },
                    }),
                ),
            ))
        }
    }
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    response("alive", None)
}

/// Prometheus metrics in text exposition format
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repositories::MemoryStore;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[tokio::test]
    async fn test_readiness_with_memory_store() {
        let state = AppState::in_memory(AppConfig::default(), MemoryStore::new());
        let response = readiness_check(State(state)).await.ok().unwrap();
        assert_eq!(response.status, "ready");
    }

    #[tokio::test]
    async fn test_metrics_absent_without_recorder() {
        let state = AppState::in_memory(AppConfig::default(), MemoryStore::new());
        assert_eq!(metrics(State(state)).await.status(), StatusCode::NOT_FOUND);
    }
}
