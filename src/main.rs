//! Trip aggregator (v1)
//!
//! An API aggregation service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http (axum + request id + trace)
//!                 │
//!                 ▼
//!           orchestration strategy ──▶ resilience (timeout, breaker)
//!                 │                          │
//!                 │                          ▼
//!                 │            flight / hotel / events / weather services
//!                 ▼
//!   Client ◀── JSON aggregate (sections + degraded flag)
//! ```

use std::path::PathBuf;

use clap::Parser;

use trip_aggregator::lifecycle;
use trip_aggregator::observability::logging;

#[derive(Parser)]
#[command(name = "trip-aggregator")]
#[command(about = "Trip search aggregator with partial-failure handling", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = lifecycle::startup::load(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("trip-aggregator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        standard_ms = config.timeouts.standard_ms,
        breaker_guarded_ms = config.timeouts.breaker_guarded_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
