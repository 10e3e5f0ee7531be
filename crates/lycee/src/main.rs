//! lycee - lycee-insight operator CLI
//!
//! Browse the institution fixtures, preview attractiveness scenarios and run
//! narrative analyses from the terminal.

use anyhow::{Context as _, Result};
use clap::Parser;
use lycee_core::DatasetStore;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (stderr, so that --json output stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("lycee=warn".parse()?))
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("lycee {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = config::Config::load()?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let store = DatasetStore::load(&data_dir)
        .with_context(|| format!("Failed to load fixtures from {:?}", data_dir))?;

    let ctx = Context {
        store: Arc::new(store),
        config,
        json: cli.json,
    };

    // Execute command
    match cli.command {
        Commands::List { division } => commands::list::execute(division.as_deref(), &ctx).await,
        Commands::Show { id } => commands::show::execute(&id, &ctx).await,
        Commands::Simulate { id, delta } => commands::simulate::execute(&id, delta, &ctx).await,
        Commands::Analyze(args) => commands::analyze::execute(args, &ctx).await,
        Commands::Version => Ok(()),
    }
}
