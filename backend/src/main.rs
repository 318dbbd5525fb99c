use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finance_tracker::config::Config;
use finance_tracker::storage::StorageBackend;
use finance_tracker::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let storage = StorageBackend::open(&config.storage).await?;
    let app_state = AppState::new(&storage, &config)?;
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving; without a signal handler the process is stopped externally
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
