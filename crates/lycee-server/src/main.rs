//! lycee-server - lycee-insight backend server
//!
//! REST API over the institution fixtures: map markers, records, scenario
//! previews and narrative analyses.

use std::sync::Arc;

use anyhow::Context;
use lycee_core::DatasetStore;
use lycee_core::completion::HttpCompletionClient;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("lycee_server=info".parse()?)
                .add_directive("lycee_core=info".parse()?),
        )
        .init();

    info!("lycee-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = config::Config::load()?;
    match &config.config_path {
        Some(path) => info!("Config loaded from {:?}", path),
        None => info!("No config file, using environment and defaults"),
    }

    // Load fixtures
    let store = DatasetStore::load(&config.data_dir)
        .with_context(|| format!("Failed to load fixtures from {:?}", config.data_dir))?;
    info!(
        institutions = store.len(),
        data_dir = ?config.data_dir,
        "Fixtures loaded"
    );

    let client = HttpCompletionClient::new(config.completion_timeout)?;
    let bind = config.bind;
    info!(
        endpoint = %config.completion.completions_url(),
        model = %config.completion.model,
        api_key = config.completion.api_key.is_some(),
        "Completion service configured"
    );

    let state = AppState::new(config, store, Arc::new(client));
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Server ready on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
