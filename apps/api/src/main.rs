mod config;
mod errors;
mod inference;
mod models;
mod routes;
mod state;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::inference::HttpInferenceClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on unparsable values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CodeClutch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize inference client
    let inference = HttpInferenceClient::new(&config.inference_base_url, config.inference_timeout)?;
    match inference.health().await {
        Ok(status) => info!(
            "Inference service at {} is {} (v{}): {}",
            inference.base_url(),
            status.status,
            status.version,
            status.message
        ),
        // Not fatal: the first stage transition will surface the failure.
        Err(e) => warn!("Inference service at {} unreachable: {e}", inference.base_url()),
    }

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(Arc::new(inference))),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
