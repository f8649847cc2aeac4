// Runtime: Telegram long polling plus the HTTP liveness endpoint (Axum)
pub mod app;
pub mod poller;
pub mod routes;

pub use app::*;
pub use poller::*;
