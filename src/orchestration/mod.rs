//! Orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler / CLI
//!     → aggregator.rs (shared state, budgeted panic-contained call primitive)
//!     → one strategy per endpoint:
//!         scatter.rs  (v1 scatter-gather, v2 versioned gather)
//!         chain.rs    (cheapest flight → hotels)
//!         branch.rs   (coastal destinations add events)
//!         guarded.rs  (weather behind the circuit breaker)
//!     → section.rs (live payload or placeholder per section)
//!     → results.rs (aggregate shapes with the degraded flag)
//! ```
//!
//! # Design Decisions
//! - Every strategy returns a complete response; failures become placeholders
//! - Empty results are not degradation
//! - Version counters live on the aggregator, not in process globals

pub mod aggregator;
pub mod branch;
pub mod chain;
pub mod guarded;
pub mod results;
pub mod scatter;
pub mod section;
pub mod versioning;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{Aggregator, AggregatorSettings};
pub use results::{AbortedRoute, CheapestRoute, ContextualTrip, PlannedRoute, TripSearch, WeatherTripSearch};
pub use section::{Placeholder, PlaceholderKind, SectionResult};
pub use versioning::{ApiVersion, VersionStats};
