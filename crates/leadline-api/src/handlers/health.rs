//! Health check handlers for service monitoring.
//!
//! Provides liveness and health endpoints. The health endpoint probes the
//! store bound for the active environment.

use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::{pipeline::StoreBinding, AppState};

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when health check was performed
    pub timestamp: DateTime<Utc>,
    /// Individual component health checks
    pub checks: HealthChecks,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Lead store reachability
    pub store: ComponentHealth,
}

/// Health status for individual components.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: ComponentStatus,
    /// Optional error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Component-level health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy
    Up,
    /// Component is experiencing issues
    Down,
}

/// Probes the store binding within `timeout`.
pub async fn check_store(binding: &StoreBinding, timeout: Duration) -> HealthResponse {
    let start = Instant::now();

    let (status, message) = match binding {
        StoreBinding::Unconfigured { environment } => {
            (ComponentStatus::Down, Some(format!("no database profile for {environment}")))
        },
        StoreBinding::Ready(store) => {
            match tokio::time::timeout(timeout, store.health_check()).await {
                Ok(Ok(())) => (ComponentStatus::Up, None),
                Ok(Err(e)) => {
                    error!(error = %e, "Store health check failed");
                    (ComponentStatus::Down, Some("store unreachable".to_string()))
                },
                Err(_) => {
                    error!(
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "Store health check timed out"
                    );
                    (ComponentStatus::Down, Some("store health check timed out".to_string()))
                },
            }
        },
    };

    let overall = match status {
        ComponentStatus::Up => HealthStatus::Healthy,
        ComponentStatus::Down => HealthStatus::Unhealthy,
    };

    HealthResponse {
        status: overall,
        timestamp: Utc::now(),
        checks: HealthChecks {
            store: ComponentHealth {
                status,
                message,
                response_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Health check endpoint handler.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let pipeline = &state.pipeline;
    let response = check_store(pipeline.store(), pipeline.settings().store_timeout).await;

    let status_code = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    debug!(
        status = ?response.status,
        store_status = ?response.checks.store.status,
        "Health check completed"
    );

    (status_code, Json(response)).into_response()
}

/// Liveness check endpoint.
///
/// Does not touch the store; only confirms the HTTP server responds.
#[instrument(name = "liveness_check")]
pub async fn liveness_check() -> Response {
    let response = serde_json::json!({
        "status": "alive",
        "timestamp": Utc::now(),
        "service": "leadline"
    });

    (StatusCode::OK, Json(response)).into_response()
}
