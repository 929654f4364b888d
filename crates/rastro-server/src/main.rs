//! Server binary: load config, wire the tracker, serve.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rastro_core::{BatchTracker, CoreError};
use rastro_server::{AppState, create_router};

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] rastro_config::ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "server failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn run() -> Result<(), ServerError> {
    let config = rastro_config::load_config()?;
    let tracker_config = rastro_config::to_tracker_config(&config)?;

    if tracker_config.simulation {
        warn!("simulation mode enabled -- upstream calls are disabled");
    } else {
        info!(url = %tracker_config.upstream_url, "real mode -- tracking against upstream");
    }

    // Composition root: provider and dispatcher are built once, here,
    // and passed down explicitly.
    let tracker = BatchTracker::from_config(&tracker_config)?;
    let state = Arc::new(AppState {
        tracker,
        max_codes: tracker_config.max_codes,
        simulation: tracker_config.simulation,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install ctrl-c handler");
        return;
    }
    info!("shutdown signal received");
}
