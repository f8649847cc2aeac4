use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::kernel::BaseSessionStore;
use crate::server::routes::health_handler;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn BaseSessionStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(sessions: Arc<dyn BaseSessionStore>) -> Self {
        Self {
            sessions,
            started_at: Instant::now(),
        }
    }
}

/// Build the Axum router. Only liveness is exposed; the bot itself talks to
/// Telegram through the poller.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
