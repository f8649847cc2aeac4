use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Users with a guided flow in progress or pending drafts.
    pub active_sessions: usize,
    pub uptime_secs: u64,
}

/// Health check endpoint
///
/// The process is healthy as long as it can answer; session count and uptime
/// are informational.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let active_sessions = state.sessions.session_count().await;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            active_sessions,
            uptime_secs: state.started_at.elapsed().as_secs(),
        }),
    )
}
