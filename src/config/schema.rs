//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the aggregator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the trip aggregator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Base URLs of the downstream data services.
    pub services: ServicesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Circuit breaker guarding the weather service.
    pub breaker: BreakerConfig,

    /// Destination classification for the branching strategy.
    pub branching: BranchingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Downstream service endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub flight_url: String,
    pub hotel_url: String,
    pub events_url: String,
    pub weather_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            flight_url: "http://localhost:3001".to_string(),
            hotel_url: "http://localhost:3002".to_string(),
            events_url: "http://localhost:3003".to_string(),
            weather_url: "http://localhost:3004".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests and downstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-call budget for the standard strategies, in milliseconds.
    pub standard_ms: u64,

    /// Per-call budget for the breaker-guarded strategy, in milliseconds.
    pub breaker_guarded_ms: u64,

    /// Outbound connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Whole inbound request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            standard_ms: 1000,
            breaker_guarded_ms: 3000,
            connect_ms: 500,
            request_secs: 30,
        }
    }
}

/// Circuit breaker parameters. Immutable once the breaker is built.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Capacity of the outcome window.
    pub window_size: usize,

    /// Failure fraction (0..=1) at which a full window opens the breaker.
    pub failure_threshold: f64,

    /// Time the breaker stays open before probing, in milliseconds.
    pub cooldown_ms: u64,

    /// Probe attempts allowed in half-open before re-opening on failure.
    pub half_open_max_probes: u32,

    /// Successful probes that must be exceeded to close again.
    pub half_open_success_threshold: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            failure_threshold: 0.4,
            cooldown_ms: 20_000,
            half_open_max_probes: 5,
            half_open_success_threshold: 3,
        }
    }
}

/// Branching strategy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BranchingConfig {
    /// Destination codes that get the optional events call.
    pub coastal_destinations: Vec<String>,
}

impl Default for BranchingConfig {
    fn default() -> Self {
        Self {
            coastal_destinations: vec!["CMB".to_string(), "BKK".to_string(), "MLE".to_string()],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
