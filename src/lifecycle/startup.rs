//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration (or fall back to defaults)
//! - Initialize metrics when enabled
//! - Build the downstream client, breaker and aggregator
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, AggregatorConfig, ConfigError};
use crate::downstream::ClientBuildError;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid metrics address {address}: {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build downstream client: {0}")]
    Client(#[from] ClientBuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Load the config file if one is given, otherwise use defaults.
pub fn load(path: Option<&Path>) -> Result<AggregatorConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(AggregatorConfig::default()),
    }
}

/// Start every subsystem and serve until SIGINT/SIGTERM.
pub async fn run(config: AggregatorConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
            address: address.clone(),
            source,
        })?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    server.run(listener, receiver).await.map_err(StartupError::Serve)
}
