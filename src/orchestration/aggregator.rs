//! The aggregator: shared state and the guarded call primitive the
//! strategies are built on.

use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;

use crate::config::AggregatorConfig;
use crate::downstream::{DownstreamClient, DownstreamError, DownstreamResult, Listing, Service};
use crate::observability::metrics;
use crate::orchestration::versioning::{VersionCounters, VersionStats};
use crate::resilience::{with_timeout, BreakerStatus, CircuitBreaker};

/// Per-strategy budgets and the coastal destination set.
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    /// Per-call budget for scatter-gather, chain, branch and v2.
    pub standard_budget: Duration,
    /// Per-call budget for the breaker-guarded search.
    pub guarded_budget: Duration,
    /// Upper-cased destination codes that receive the events call.
    pub coastal_destinations: HashSet<String>,
}

impl AggregatorSettings {
    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self {
            standard_budget: Duration::from_millis(config.timeouts.standard_ms),
            guarded_budget: Duration::from_millis(config.timeouts.breaker_guarded_ms),
            coastal_destinations: config
                .branching
                .coastal_destinations
                .iter()
                .map(|code| code.trim().to_ascii_uppercase())
                .collect(),
        }
    }
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self::from_config(&AggregatorConfig::default())
    }
}

/// Fans requests out to the downstream services and assembles
/// degradation-aware responses.
pub struct Aggregator {
    pub(crate) client: Arc<dyn DownstreamClient>,
    pub(crate) breaker: Arc<CircuitBreaker>,
    pub(crate) settings: AggregatorSettings,
    pub(crate) versions: VersionCounters,
}

impl Aggregator {
    /// `breaker` guards the weather service in the breaker-guarded search.
    pub fn new(
        client: Arc<dyn DownstreamClient>,
        breaker: Arc<CircuitBreaker>,
        settings: AggregatorSettings,
    ) -> Self {
        Self {
            client,
            breaker,
            settings,
            versions: VersionCounters::new(),
        }
    }

    pub fn breaker_status(&self) -> BreakerStatus {
        self.breaker.status()
    }

    pub fn version_stats(&self) -> VersionStats {
        self.versions.snapshot()
    }

    pub(crate) fn is_coastal(&self, destination: &str) -> bool {
        self.settings
            .coastal_destinations
            .contains(&destination.trim().to_ascii_uppercase())
    }

    /// Run one dependency call under its budget. See [`budgeted_call`].
    pub(crate) async fn call<T, F>(&self, service: Service, budget: Duration, call: F) -> DownstreamResult<T>
    where
        T: Listing,
        F: Future<Output = DownstreamResult<T>>,
    {
        budgeted_call(service, budget, call).await
    }

    pub(crate) fn note_degraded(&self, strategy: &'static str, degraded: bool) {
        if degraded {
            tracing::warn!(strategy, "Returning degraded aggregate");
            metrics::record_degraded(strategy);
        }
    }
}

/// Run one dependency call under its budget.
///
/// A panic inside the call is contained here and reported as
/// `Unavailable`, so one faulty path degrades a single section instead
/// of failing the whole aggregate.
pub(crate) async fn budgeted_call<T, F>(service: Service, budget: Duration, call: F) -> DownstreamResult<T>
where
    T: Listing,
    F: Future<Output = DownstreamResult<T>>,
{
    let start = Instant::now();

    let contained = AssertUnwindSafe(call).catch_unwind().map(|settled| {
        settled.unwrap_or_else(|panic| {
            let detail = panic_message(panic.as_ref());
            tracing::error!(service = %service, panic = %detail, "Downstream call panicked");
            Err(DownstreamError::unavailable(service, format!("internal fault: {}", detail)))
        })
    });

    let result = with_timeout(service, budget, contained).await;

    let outcome = match &result {
        Ok(payload) if payload.is_empty() => "empty",
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::record_downstream_call(service.name(), outcome, start);

    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
