use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use slotlist_api::{
    build_router, config::AppConfig, logging, notifications::InMemoryNotificationStore, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, HTTP_PORT, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    logging::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        "Starting API server in {:?} mode (http: {:?}, jwt: {:?})",
        config.environment,
        config.http,
        config.jwt
    );

    if config.jwt.secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set, every authenticated request will be rejected");
    }

    let bind_addr = config.http.bind_addr();
    let state = AppState::new(config, Arc::new(InMemoryNotificationStore::new()));
    let started_at = state.started_at;
    let app = build_router(state).context("invalid route table")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Successfully started API server on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    let stopped_at = Utc::now();
    tracing::info!(
        "Successfully stopped API server (started: {}, stopped: {}, uptime: {}s)",
        started_at,
        stopped_at,
        (stopped_at - started_at).num_seconds()
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Stopping API server");
}
