//! Dependency identities and failure taxonomy.

use std::fmt;

use thiserror::Error;

/// A downstream data service the aggregator depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Flight,
    Hotel,
    Events,
    Weather,
}

impl Service {
    /// Name used in logs, metrics and timeout errors.
    pub fn name(self) -> &'static str {
        match self {
            Service::Flight => "flight-service",
            Service::Hotel => "hotel-service",
            Service::Events => "events-service",
            Service::Weather => "weather-service",
        }
    }

    /// Placeholder text for a successful call with no business results.
    pub fn empty_message(self) -> &'static str {
        match self {
            Service::Flight => "No flights available for this route",
            Service::Hotel => "No hotels available for this destination",
            Service::Events => "No events found for this destination",
            Service::Weather => "No forecast available for this destination",
        }
    }

    /// Placeholder text for a failed or timed-out call.
    pub fn unavailable_message(self) -> &'static str {
        match self {
            Service::Flight => "Flight service unavailable",
            Service::Hotel => "Hotel service unavailable",
            Service::Events => "Events service unavailable",
            Service::Weather => "Weather data unavailable",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors a dependency call can end in.
///
/// An empty result set is not represented here: it is a successful payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownstreamError {
    /// Deadline exceeded while waiting on the dependency.
    #[error("{service} timeout after {budget_ms}ms")]
    Timeout { service: Service, budget_ms: u64 },

    /// Transport failure, bad status, undecodable payload or a faulted call.
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: Service, reason: String },

    /// Call skipped because the dependency's breaker is open.
    #[error("{service} skipped: circuit breaker open")]
    BreakerOpen { service: Service },
}

impl DownstreamError {
    pub fn unavailable(service: Service, reason: impl Into<String>) -> Self {
        DownstreamError::Unavailable {
            service,
            reason: reason.into(),
        }
    }

    pub fn service(&self) -> Service {
        match self {
            DownstreamError::Timeout { service, .. }
            | DownstreamError::Unavailable { service, .. }
            | DownstreamError::BreakerOpen { service } => *service,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DownstreamError::Timeout { .. } => "timeout",
            DownstreamError::Unavailable { .. } => "unavailable",
            DownstreamError::BreakerOpen { .. } => "breaker_open",
        }
    }
}

/// Result type for dependency calls.
pub type DownstreamResult<T> = Result<T, DownstreamError>;
