//! HTTP adapter over an [`AccountService`]
//!
//! The adapter holds no business rules: it parses path and query values,
//! forwards to the service and translates failures with [`ApiError`].

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{router, AccountView, CreateParams, SharedService};

use crate::core::AccountService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Listener and runtime settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the server listens on
    pub bind: SocketAddr,
    /// Number of tokio worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 4567)),
            workers: num_cpus::get(),
        }
    }
}

impl ServerConfig {
    /// Create a config; a worker count of zero falls back to the CPU count
    pub fn new(bind: SocketAddr, workers: usize) -> Self {
        let workers = if workers == 0 {
            let fallback = num_cpus::get();
            warn!(fallback, "worker count must be at least 1, using CPU count");
            fallback
        } else {
            workers
        };

        Self { bind, workers }
    }
}

/// Serve the ledger API until ctrl-c is received
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, service: Arc<dyn AccountService>) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, workers = config.workers, "ledger listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!(error = %e, "failed to listen for shutdown signal"),
    }
}
