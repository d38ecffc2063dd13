//! Startup orchestration.
//!
//! Subsystems initialize in dependency order and any failure is fatal:
//! metrics, upstream client, relay handler, then the listener last so
//! traffic only arrives once everything is ready.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::SinkConfig;
use crate::http::SinkServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;
use crate::relay::{ConfigError, RelayHandler, RelayOptions};
use crate::upstream::UpstreamClient;

/// Fatal startup failure.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address {0}")]
    MetricsAddress(String),
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Relay(#[from] ConfigError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Build every subsystem from `config` and serve until a shutdown signal.
pub async fn run(config: SinkConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let client = UpstreamClient::new(&config.client)?;
    let logger = tracing::dispatcher::get_default(|dispatch| dispatch.clone());
    let handler = RelayHandler::new(logger, client, RelayOptions::from(&config.relay))?;

    let listener = Listener::bind(&config.listener).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        target = handler.target().unwrap_or("-"),
        verbose = config.relay.verbose,
        status_code = handler.fallback_status().as_u16(),
        wait = ?handler.wait(),
        "Listening"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = SinkServer::new(Arc::new(handler), config.listener.shutdown_timeout);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
