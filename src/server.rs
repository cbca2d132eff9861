//! Server startup: build state, bind, serve until shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::fetch::{FetchError, HttpFetcher};
use crate::routes;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("page fetcher init failed: {0}")]
    Fetcher(#[from] FetchError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the HTTP server until ctrl-c.
///
/// # Errors
///
/// Returns an error if the fetcher cannot be built, the listen address
/// cannot be bound, or the server loop fails.
pub async fn serve(config: AppConfig) -> Result<(), ServeError> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let addr = config.listen_addr();
    let state = AppState::new(config, Arc::new(fetcher));

    let app = routes::app(state);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind { addr: addr.clone(), source })?;

    info!(%addr, "page-analyzer listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Serve)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
