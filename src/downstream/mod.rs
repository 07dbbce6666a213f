//! Downstream service subsystem.
//!
//! # Data Flow
//! ```text
//! orchestration strategy
//!     → client.rs (DownstreamClient trait, one method per operation)
//!     → http.rs (reqwest implementation against configured base URLs)
//!     → types.rs (typed payloads, unknown fields passed through)
//!     → error.rs (Timeout / Unavailable / BreakerOpen taxonomy)
//! ```
//!
//! # Design Decisions
//! - The client is a trait object so strategies can be tested with scripted fakes
//! - An empty result set is a successful payload, never an error
//! - Deadlines live in the resilience layer, not in the client

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::DownstreamClient;
pub use error::{DownstreamError, DownstreamResult, Service};
pub use http::{ClientBuildError, HttpDownstream};
pub use types::{
    CheapestFlight, EventSearch, Flight, FlightSearch, Forecast, HotelQuery, HotelSearch, Listing,
    RouteQuery,
};
