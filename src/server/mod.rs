//! HTTP front end
//!
//! Serves the export form and `POST /api/export`.

mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Args;
use reqwest::Client;
use tracing::info;

use crate::sonar::{build_http_client, PaginationConfig};
use crate::util::Settings;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on [default: from settings, 127.0.0.1:3000]
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Read-only state shared by all requests
#[derive(Clone)]
pub struct AppState {
    pub http: Client,
    pub pagination: PaginationConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/export", post(handlers::export))
        .with_state(state)
}

/// Run the HTTP server until Ctrl-C
#[cfg(not(tarpaulin_include))]
pub async fn run(args: ServeArgs, settings: &Settings) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| settings.server.bind.clone());
    let state = AppState {
        http: build_http_client()?,
        pagination: settings.export,
    };

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let addr = listener.local_addr()?;
    info!(%addr, "listening");
    println!("Serving on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
