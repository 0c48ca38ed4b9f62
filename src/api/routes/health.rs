//! Health Routes
//!
//! Health check endpoints for monitoring.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (user database reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{HealthResponse, ReadinessResponse};
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 503 when the user database directory has gone away.
pub async fn readiness(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match check_storage(&state).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                reason: None,
            }),
        ),
        Err(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                reason: Some(reason),
            }),
        ),
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let storage_ok = check_storage(&state).await.is_ok();
    let storage = match (state.users.is_persistent(), storage_ok) {
        (false, _) => "memory",
        (true, true) => "file",
        (true, false) => "error",
    };

    Json(HealthResponse {
        status: if storage_ok { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        users: state.users.count().await,
        storage: storage.to_string(),
    })
}

async fn check_storage(state: &AppState) -> Result<(), String> {
    let Some(path) = state.users.db_path() else {
        return Ok(());
    };
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    match tokio::fs::metadata(parent).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(format!("{:?} is not a directory", parent)),
        Err(e) => Err(format!("{:?}: {}", parent, e)),
    }
}
