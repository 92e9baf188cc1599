use anyhow::{Context, Result};
use std::time::Duration;

use tracing::info;

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::announce_routes::announce_routes;
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub name: &'static str,
    pub version: &'static str,
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime: format_uptime(state.start_time.elapsed()),
    };
    Json(stats)
}

pub fn make_app(
    config: ServerConfig,
    announce_store: GuardedAnnounceStore,
    identity_resolver: GuardedIdentityResolver,
) -> Router {
    let max_upload_bytes = announce_store.settings().max_upload_bytes;
    let state = ServerState::new(config.clone(), announce_store, identity_resolver);

    Router::new()
        .route("/", get(home))
        .nest("/announce", announce_routes(max_upload_bytes))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            config.requests_logging_level,
            log_requests,
        ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections...");
}

pub async fn run_server(
    config: ServerConfig,
    announce_store: GuardedAnnounceStore,
    identity_resolver: GuardedIdentityResolver,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, announce_store, identity_resolver);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
