// Main entry point for the contribution bot

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use panshare_core::domains::submissions::edges::SubmissionHandler;
use panshare_core::domains::submissions::{ContentPolicy, FanoutResolver};
use panshare_core::kernel::{InMemorySessionStore, ServerDeps, TelegramAdapter};
use panshare_core::server::{build_app, AppState, Poller};
use panshare_core::Config;
use telegram::{TelegramOptions, TelegramService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,panshare_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting contribution bot");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        broadcast = ?config.channels.broadcast,
        providers = config.channels.provider_channels.len(),
        "Configuration loaded"
    );

    // Telegram client
    let mut options = TelegramOptions::new(config.telegram_bot_token.clone());
    options.api_base = config.telegram_api_base.clone();
    let telegram = Arc::new(TelegramService::new(options));

    // Dependencies
    let sessions = Arc::new(InMemorySessionStore::new());
    let deps = Arc::new(ServerDeps::new(
        Arc::new(TelegramAdapter::new(telegram.clone())),
        sessions.clone(),
        ContentPolicy::new(config.policy.clone()),
        FanoutResolver::new(config.channels.clone()),
        config.delivery,
    ));
    let handler = Arc::new(SubmissionHandler::new(deps));

    // Build application
    let app = build_app(AppState::new(sessions));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    let poller = Poller::new(telegram, handler, config.poll_timeout_secs);

    tokio::select! {
        result = poller.run() => result.context("Poller stopped")?,
        result = axum::serve(listener, app).into_future() => result.context("Server error")?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}
