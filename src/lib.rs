//! Trip aggregator library.
//!
//! Fans inbound trip searches out to flight, hotel, events and weather
//! services and returns partial, degradation-aware aggregates.

pub mod config;
pub mod downstream;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestration;
pub mod resilience;

pub use config::AggregatorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use orchestration::Aggregator;
