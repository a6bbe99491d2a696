mod cli;
mod singleton;

use anyhow::{Context, Result};
use clap::Parser;
use datepoll_core::{JsonFileStore, MemoryStore};
use datepoll_server::app;
use datepoll_server::state::AppState;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings().context("Failed to load settings")?;

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (state, _lock) = if cli.in_memory {
        tracing::warn!("running with an in-memory store, events are lost on exit");
        (AppState::new(MemoryStore::new()), None)
    } else {
        let lock = singleton::acquire_lock(&settings.data_file)?;
        tracing::info!(path = %settings.data_file.display(), "using event document");
        (AppState::new(JsonFileStore::new(&settings.data_file)), Some(lock))
    };

    // Fail at startup rather than on the first request if the document is unreadable
    state
        .book()
        .await
        .with_context(|| format!("Failed to read {}", settings.data_file.display()))?;

    let listener = tokio::net::TcpListener::bind(settings.address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.address))?;
    tracing::info!("datepoll-server listening on http://{}", settings.address);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
