use crate::handlers::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

/// Individual component health details
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    pub message: String,
}

/// Full health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub timestamp: String,
    pub database: ComponentHealth,
}

/// Liveness probe: reports service version and database connectivity
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => ComponentHealth {
            status: ComponentStatus::Up,
            message: "connected".to_string(),
        },
        Err(err) => ComponentHealth {
            status: ComponentStatus::Down,
            message: err.to_string(),
        },
    };

    Json(HealthResponse {
        status: database.status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
    })
}
