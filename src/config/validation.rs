//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, threshold within 0..=1, timeouts > 0)
//! - Check that service endpoints and bind addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AggregatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AggregatorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("breaker.failure_threshold must be within 0..=1, got {0}")]
    ThresholdOutOfRange(f64),

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check every semantic constraint and collect all violations.
pub fn validate_config(config: &AggregatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let breaker = &config.breaker;
    if breaker.window_size == 0 {
        errors.push(ValidationError::NotPositive { field: "breaker.window_size" });
    }
    if !(0.0..=1.0).contains(&breaker.failure_threshold) {
        errors.push(ValidationError::ThresholdOutOfRange(breaker.failure_threshold));
    }
    if breaker.half_open_max_probes == 0 {
        errors.push(ValidationError::NotPositive { field: "breaker.half_open_max_probes" });
    }
    if breaker.half_open_success_threshold == 0 {
        errors.push(ValidationError::NotPositive {
            field: "breaker.half_open_success_threshold",
        });
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.standard_ms", timeouts.standard_ms),
        ("timeouts.breaker_guarded_ms", timeouts.breaker_guarded_ms),
        ("timeouts.connect_ms", timeouts.connect_ms),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::NotPositive { field });
        }
    }

    let services = &config.services;
    for (field, value) in [
        ("services.flight_url", &services.flight_url),
        ("services.hotel_url", &services.hotel_url),
        ("services.events_url", &services.events_url),
        ("services.weather_url", &services.weather_url),
    ] {
        let valid = Url::parse(value)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidUrl { field, value: value.clone() });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
