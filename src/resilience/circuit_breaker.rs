//! Circuit breaker for dependency protection.
//!
//! # States
//! - Closed: normal operation, outcomes accumulate in a sliding window
//! - Open: dependency assumed down, requests are skipped
//! - Half-Open: live probe calls test whether the dependency recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: window full and failures / window_size >= failure_threshold
//! Open → Half-Open: first outcome pushed after cooldown_ms has elapsed
//! Half-Open → Closed: successful probes > half_open_success_threshold (window cleared)
//! Half-Open → Open: a failed probe once probe attempts >= half_open_max_probes
//! ```
//!
//! # Design Decisions
//! - Transitions are a pure function of (config, runtime, event), applied
//!   under one lock acquisition so concurrent requests never interleave a
//!   read-modify-write
//! - Cooldown is evaluated lazily on the next outcome push; there is no timer,
//!   so an idle dependency stays Open until traffic arrives
//! - Probe attempts count every reported probe; the re-open check runs on failures
//! - Time comes from an injected `Clock`

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::BreakerConfig;
use crate::observability::metrics;
use crate::resilience::clock::{Clock, SystemClock};
use crate::resilience::window::{Outcome, OutcomeWindow};

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakerState {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    /// Numeric encoding used by the state gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            BreakerState::Closed => 0.0,
            BreakerState::Open => 1.0,
            BreakerState::HalfOpen => 2.0,
        }
    }
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BreakerState::Closed => "CLOSED",
            BreakerState::Open => "OPEN",
            BreakerState::HalfOpen => "HALF_OPEN",
        })
    }
}

/// Mutable breaker data. Only ever changed through [`transition`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakerRuntime {
    pub state: BreakerState,
    pub window: OutcomeWindow,
    pub opened_at: Option<Instant>,
    pub half_open_probes: u32,
    pub half_open_successes: u32,
}

impl BreakerRuntime {
    pub fn new(config: &BreakerConfig) -> Self {
        Self {
            window: OutcomeWindow::new(config.window_size),
            ..Self::default()
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakerEvent {
    /// An outcome appended to the sliding window.
    Outcome { outcome: Outcome, now: Instant },
    /// The result of a half-open probe call.
    Probe { success: bool, now: Instant },
}

/// A state change produced by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: BreakerState,
    pub to: BreakerState,
    pub reason: &'static str,
}

/// Apply one event to the breaker runtime.
pub fn transition(
    config: &BreakerConfig,
    mut runtime: BreakerRuntime,
    event: BreakerEvent,
) -> (BreakerRuntime, Option<Transition>) {
    let from = runtime.state;

    let reason = match event {
        BreakerEvent::Outcome { outcome, now } => {
            runtime.window.push(outcome);

            match runtime.state {
                BreakerState::Open => {
                    let cooldown = Duration::from_millis(config.cooldown_ms);
                    let cooled = runtime
                        .opened_at
                        .map_or(true, |at| now.saturating_duration_since(at) > cooldown);
                    if cooled {
                        runtime.state = BreakerState::HalfOpen;
                        runtime.half_open_probes = 0;
                        runtime.half_open_successes = 0;
                        Some("cooldown elapsed")
                    } else {
                        None
                    }
                }
                BreakerState::HalfOpen => None,
                BreakerState::Closed => {
                    let window = &runtime.window;
                    let rate = window.failures() as f64 / config.window_size as f64;
                    if window.is_full() && rate >= config.failure_threshold {
                        runtime.state = BreakerState::Open;
                        runtime.opened_at = Some(now);
                        Some("failure rate over threshold")
                    } else {
                        None
                    }
                }
            }
        }
        BreakerEvent::Probe { success, now } => {
            if runtime.state != BreakerState::HalfOpen {
                return (runtime, None);
            }

            runtime.half_open_probes += 1;

            if success {
                runtime.half_open_successes += 1;
                if runtime.half_open_successes > config.half_open_success_threshold {
                    runtime.state = BreakerState::Closed;
                    runtime.window.clear();
                    runtime.opened_at = None;
                    Some("probe succeeded")
                } else {
                    None
                }
            } else if runtime.half_open_probes >= config.half_open_max_probes {
                runtime.state = BreakerState::Open;
                runtime.opened_at = Some(now);
                Some("probe failed")
            } else {
                None
            }
        }
    };

    let transition = reason.map(|reason| Transition {
        from,
        to: runtime.state,
        reason,
    });
    (runtime, transition)
}

/// Read-only snapshot for observability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakerStatus {
    pub dependency: String,
    pub state: BreakerState,
    pub window_size: usize,
    pub failure_threshold: f64,
    pub cooldown_ms: u64,
    pub half_open_max_probes: u32,
    pub half_open_success_threshold: u32,
    pub half_open_probes: u32,
    pub half_open_successes: u32,
    pub outcomes: Vec<Outcome>,
    pub failure_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_for_ms: Option<u64>,
}

/// A sliding-window circuit breaker guarding one dependency.
///
/// Shared across requests behind an `Arc`; all mutation goes through
/// [`CircuitBreaker::push_outcome`] and [`CircuitBreaker::on_probe_result`].
pub struct CircuitBreaker {
    dependency: String,
    config: BreakerConfig,
    clock: Arc<dyn Clock>,
    runtime: Mutex<BreakerRuntime>,
}

impl CircuitBreaker {
    /// Create a breaker driven by the system clock.
    pub fn new(dependency: impl Into<String>, config: BreakerConfig) -> Self {
        Self::with_clock(dependency, config, Arc::new(SystemClock))
    }

    /// Create a breaker with an explicit time source.
    pub fn with_clock(dependency: impl Into<String>, config: BreakerConfig, clock: Arc<dyn Clock>) -> Self {
        let dependency = dependency.into();
        let runtime = BreakerRuntime::new(&config);
        metrics::record_breaker_state(&dependency, runtime.state);
        Self {
            dependency,
            config,
            clock,
            runtime: Mutex::new(runtime),
        }
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// False only while the breaker is Open.
    pub fn allow_request(&self) -> bool {
        self.state() != BreakerState::Open
    }

    /// Append an outcome to the window and re-evaluate the state.
    pub fn push_outcome(&self, outcome: Outcome) -> BreakerState {
        let now = self.clock.now();
        self.apply(BreakerEvent::Outcome { outcome, now })
    }

    /// Report a half-open probe result. Ignored in any other state.
    pub fn on_probe_result(&self, success: bool) -> BreakerState {
        let now = self.clock.now();
        self.apply(BreakerEvent::Probe { success, now })
    }

    pub fn status(&self) -> BreakerStatus {
        let now = self.clock.now();
        let runtime = self.lock();
        BreakerStatus {
            dependency: self.dependency.clone(),
            state: runtime.state,
            window_size: self.config.window_size,
            failure_threshold: self.config.failure_threshold,
            cooldown_ms: self.config.cooldown_ms,
            half_open_max_probes: self.config.half_open_max_probes,
            half_open_success_threshold: self.config.half_open_success_threshold,
            half_open_probes: runtime.half_open_probes,
            half_open_successes: runtime.half_open_successes,
            outcomes: runtime.window.to_vec(),
            failure_rate: runtime.window.failure_rate(),
            open_for_ms: match runtime.state {
                BreakerState::Open => runtime
                    .opened_at
                    .map(|at| now.saturating_duration_since(at).as_millis() as u64),
                _ => None,
            },
        }
    }

    fn apply(&self, event: BreakerEvent) -> BreakerState {
        let (state, transition) = {
            let mut runtime = self.lock();
            let current = std::mem::take(&mut *runtime);
            let (next, transition) = transition(&self.config, current, event);
            *runtime = next;
            (runtime.state, transition)
        };

        if let Some(t) = transition {
            tracing::info!(
                dependency = %self.dependency,
                from = %t.from,
                to = %t.to,
                reason = t.reason,
                "[CB] {} -> {}",
                t.from,
                t.to
            );
            metrics::record_breaker_state(&self.dependency, t.to);
        }
        state
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerRuntime> {
        self.runtime.lock().unwrap_or_else(|e| e.into_inner())
    }
}
