//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, whole-request timeout)
//! - Build the aggregator and its downstream client from config
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AggregatorConfig;
use crate::downstream::{ClientBuildError, HttpDownstream};
use crate::http::handlers;
use crate::http::request::{request_id_header, request_span, UuidRequestId};
use crate::orchestration::{Aggregator, AggregatorSettings};
use crate::resilience::CircuitBreaker;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

/// HTTP server for the trip aggregator.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server talking to the configured downstream services.
    pub fn new(config: AggregatorConfig) -> Result<Self, ClientBuildError> {
        let client = HttpDownstream::new(
            &config.services,
            Duration::from_millis(config.timeouts.connect_ms),
        )?;
        let breaker = Arc::new(CircuitBreaker::new("weather-service", config.breaker.clone()));
        let aggregator = Aggregator::new(
            Arc::new(client),
            breaker,
            AggregatorSettings::from_config(&config),
        );

        Ok(Self::with_aggregator(config, Arc::new(aggregator)))
    }

    /// Create a server around an already-built aggregator.
    pub fn with_aggregator(config: AggregatorConfig, aggregator: Arc<Aggregator>) -> Self {
        let router = Self::build_router(&config, AppState { aggregator });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AggregatorConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/v1/trips/search", get(handlers::search_trips))
            .route("/v1/trips/cheapest-route", get(handlers::cheapest_route))
            .route("/v1/trips/contextual", get(handlers::contextual_trip))
            .route("/v2/trips/search", get(handlers::search_trips_v2))
            .route("/v2-cb/trips/search", get(handlers::search_trips_guarded))
            .route("/versioning/stats", get(handlers::version_stats))
            .route("/circuit-breaker/status", get(handlers::breaker_status))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::new(request_id_header(), UuidRequestId))
    }

    /// The fully layered router, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
