//! Monitoring and health check handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy.
    Healthy,
    /// Service is degraded but functional.
    Degraded,
    /// Service is unhealthy.
    Unhealthy,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Version information.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Requests served since startup.
    pub request_count: u64,
    /// Component health checks.
    pub components: Vec<ComponentHealth>,
}

/// Component health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name.
    pub name: String,
    /// Component status.
    pub status: HealthStatus,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    /// Worst status among `components`.
    fn overall(components: &[ComponentHealth]) -> Self {
        if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if components.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

async fn storage_health(state: &AppState) -> ComponentHealth {
    let dir = state.store.dir();
    let (status, message) = match tokio::fs::metadata(dir).await {
        // Reads still work from a read-only directory, submissions do not.
        Ok(meta) if meta.is_dir() && meta.permissions().readonly() => (
            HealthStatus::Degraded,
            Some(format!("{} is read-only", dir.display())),
        ),
        Ok(meta) if meta.is_dir() => (HealthStatus::Healthy, None),
        Ok(_) => (
            HealthStatus::Unhealthy,
            Some(format!("{} is not a directory", dir.display())),
        ),
        Err(e) => (
            HealthStatus::Unhealthy,
            Some(format!("{}: {}", dir.display(), e)),
        ),
    };

    ComponentHealth {
        name: "storage".to_string(),
        status,
        message,
    }
}

/// Health check handler.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let components = vec![
        ComponentHealth {
            name: "api".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        },
        storage_health(&state).await,
    ];

    Json(HealthResponse {
        status: HealthStatus::overall(&components),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        request_count: state.request_count(),
        components,
    })
}

/// Liveness probe (Kubernetes).
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}

#[cfg(test)]
#[path = "monitoring_tests.rs"]
mod tests;
