//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    pub version: String,
}

/// GET /health - Database connectivity and storage backend
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.auth_service.admins().health().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        storage: state.store.backend().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
