// ABOUTME: Server binary for the training guidelines rule engine
// ABOUTME: Loads configuration, initializes logging, and serves the guidelines HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Diretriz Server Binary
//!
//! Starts the HTTP API for guideline versions, rules, catalogs, and previews
//! over an in-memory store.

use anyhow::Result;
use axum::http::StatusCode;
use clap::Parser;
use diretriz_engine::EngineConfig;
use diretriz_server::{
    config::environment::ServerConfig,
    logging,
    routes::{router, AppState},
    store::InMemoryGuidelineStore,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

/// Command-line overrides for the server configuration
#[derive(Parser)]
#[command(name = "diretriz-server")]
#[command(about = "Diretriz - Training guidelines rule engine and preview API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    config.validate()?;

    logging::init_from_env()?;

    info!("Starting Diretriz guidelines server");
    info!("{}", config.summary());

    let engine_config = Arc::new(EngineConfig::load()?);
    info!(
        default_aerobic_method = %engine_config.preview.default_aerobic_method,
        "Engine configuration loaded"
    );

    let store = Arc::new(InMemoryGuidelineStore::new(engine_config.limits.clone()));
    let state = AppState::new(store, engine_config);

    let app = router(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(TraceLayer::new_for_http());

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server listening on {bind_address}");
    display_available_endpoints(&config);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}

fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}", config.bind_address());
    info!("=== Available API Endpoints ===");
    info!("Health:");
    info!("  GET    {base}/health");
    info!("Catalog:");
    info!("  GET    {base}/api/guidelines/catalog/tags");
    info!("  GET    {base}/api/guidelines/catalog/protocols");
    info!("  GET    {base}/api/guidelines/catalog/rir");
    info!("Versions:");
    info!("  GET    {base}/api/guidelines/versions");
    info!("  POST   {base}/api/guidelines/versions");
    info!("  GET    {base}/api/guidelines/versions/:id");
    info!("  POST   {base}/api/guidelines/versions/:id/publish");
    info!("  POST   {base}/api/guidelines/versions/:id/correct");
    info!("  POST   {base}/api/guidelines/versions/:id/default");
    info!("Rules:");
    info!("  GET    {base}/api/guidelines/versions/:id/rules");
    info!("  POST   {base}/api/guidelines/versions/:id/rules");
    info!("  PUT    {base}/api/guidelines/versions/:id/rules/:rule_id");
    info!("  DELETE {base}/api/guidelines/versions/:id/rules/:rule_id");
    info!("Preview:");
    info!("  POST   {base}/api/guidelines/versions/:id/preview");
    info!("=== End of Endpoint List ===");
}
