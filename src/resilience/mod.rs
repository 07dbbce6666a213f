//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a dependency:
//!     → timeouts.rs (race the call against its budget, cancel on expiry)
//!     → circuit_breaker.rs (guarded dependencies only: allow/skip, record outcome)
//!         → window.rs (fixed-capacity outcome ring buffer)
//!         → clock.rs (injected time source)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - The breaker is a long-lived shared object, injected rather than owned by a strategy
//! - Breaker transitions are a pure function so they can be tested without I/O

pub mod circuit_breaker;
pub mod clock;
pub mod timeouts;
pub mod window;

pub use circuit_breaker::{BreakerState, BreakerStatus, CircuitBreaker};
pub use clock::{Clock, ManualClock, SystemClock};
pub use timeouts::with_timeout;
pub use window::{Outcome, OutcomeWindow};
