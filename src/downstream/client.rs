//! The downstream client seam.

use async_trait::async_trait;

use crate::downstream::error::DownstreamResult;
use crate::downstream::types::{
    CheapestFlight, EventSearch, FlightSearch, Forecast, HotelQuery, HotelSearch, RouteQuery,
};

/// Performs the network call to a named downstream service.
///
/// Implementations report transport problems as `DownstreamError::Unavailable`;
/// deadlines are enforced by the caller, which drops the returned future on
/// timeout.
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    async fn search_flights(&self, query: &RouteQuery) -> DownstreamResult<FlightSearch>;

    async fn cheapest_flight(&self, query: &RouteQuery) -> DownstreamResult<CheapestFlight>;

    async fn search_hotels(&self, query: &HotelQuery) -> DownstreamResult<HotelSearch>;

    async fn search_events(&self, query: &RouteQuery) -> DownstreamResult<EventSearch>;

    async fn forecast(&self, query: &RouteQuery) -> DownstreamResult<Forecast>;
}
