mod singleton;

use std::net::SocketAddr;

use anyhow::Result;
use sessiondir_core::SessionDir;
use sessiondir_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Ensure only one instance is running
    let _lock = singleton::acquire_lock()?;

    let sessiondir = SessionDir::load()?;
    let port = sessiondir.config().server_port;
    info!("Serving data from {}", sessiondir.data_path().display());

    let app = sessiondir_server::app(AppState::new(sessiondir));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("sessiondir-server listening on http://{}", addr);
    info!("Update endpoint: http://{}/api/update", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down server");
}
