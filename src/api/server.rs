use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::ServerConfig;
use crate::error::Result;

/// Bind and serve until ctrl-c.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("screening service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("screening service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
