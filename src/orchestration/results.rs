//! Aggregate response shapes, one per strategy.
//!
//! Every aggregate carries `degraded`, the OR of its sections' degraded flags.

use serde::Serialize;
use serde_json::Value;

use crate::downstream::{DownstreamError, EventSearch, Flight, FlightSearch, Forecast, HotelSearch};
use crate::orchestration::section::SectionResult;

/// Scatter-gather result: flights and hotels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSearch {
    pub flights: SectionResult<FlightSearch>,
    pub hotels: SectionResult<HotelSearch>,
    pub degraded: bool,
}

impl TripSearch {
    pub fn new(flights: SectionResult<FlightSearch>, hotels: SectionResult<HotelSearch>) -> Self {
        let degraded = flights.is_degraded() || hotels.is_degraded();
        Self {
            flights,
            hotels,
            degraded,
        }
    }
}

/// Flights and hotels plus a weather forecast (v2 and breaker-guarded searches).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherTripSearch {
    pub flights: SectionResult<FlightSearch>,
    pub hotels: SectionResult<HotelSearch>,
    pub weather: SectionResult<Forecast>,
    pub degraded: bool,
}

impl WeatherTripSearch {
    pub fn new(
        flights: SectionResult<FlightSearch>,
        hotels: SectionResult<HotelSearch>,
        weather: SectionResult<Forecast>,
    ) -> Self {
        let degraded = flights.is_degraded() || hotels.is_degraded() || weather.is_degraded();
        Self {
            flights,
            hotels,
            weather,
            degraded,
        }
    }
}

/// Branching result: the events section depends on the destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextualTrip {
    pub flights: SectionResult<FlightSearch>,
    pub hotels: SectionResult<HotelSearch>,
    pub events: SectionResult<EventSearch>,
    pub degraded: bool,
}

impl ContextualTrip {
    pub fn new(
        flights: SectionResult<FlightSearch>,
        hotels: SectionResult<HotelSearch>,
        events: SectionResult<EventSearch>,
    ) -> Self {
        let degraded = flights.is_degraded() || hotels.is_degraded() || events.is_degraded();
        Self {
            flights,
            hotels,
            events,
            degraded,
        }
    }
}

/// Chaining result: a complete plan, or an abort with no partial payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheapestRoute {
    Planned(PlannedRoute),
    Aborted(AbortedRoute),
}

impl CheapestRoute {
    pub fn aborted(cause: &DownstreamError) -> Self {
        CheapestRoute::Aborted(AbortedRoute {
            message: "Partial or failed aggregation".to_string(),
            reason: cause.to_string(),
            degraded: true,
        })
    }

    pub fn is_degraded(&self) -> bool {
        match self {
            CheapestRoute::Planned(plan) => plan.degraded,
            CheapestRoute::Aborted(abort) => abort.degraded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRoute {
    pub flight: Flight,
    pub hotels: Vec<Value>,
    pub late_check_in: bool,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortedRoute {
    pub message: String,
    pub reason: String,
    pub degraded: bool,
}
