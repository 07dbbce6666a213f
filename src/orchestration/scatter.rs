//! Scatter-gather searches (v1 and the weather-enriched v2).
//!
//! All calls are started together and every one is allowed to settle; a
//! failed call degrades only its own section.

use crate::downstream::{HotelQuery, RouteQuery, Service};
use crate::orchestration::aggregator::Aggregator;
use crate::orchestration::results::{TripSearch, WeatherTripSearch};
use crate::orchestration::section::SectionResult;
use crate::orchestration::versioning::ApiVersion;

impl Aggregator {
    /// v1 search: flights and hotels in parallel.
    pub async fn search_trips(&self, query: &RouteQuery) -> TripSearch {
        let hits = self.versions.record(ApiVersion::V1);
        tracing::info!(hits, "searchTrips v1");

        let budget = self.settings.standard_budget;
        let hotel_query = HotelQuery::for_destination(&query.to);

        let (flights, hotels) = tokio::join!(
            self.call(Service::Flight, budget, self.client.search_flights(query)),
            self.call(Service::Hotel, budget, self.client.search_hotels(&hotel_query)),
        );

        let result = TripSearch::new(
            SectionResult::from_call(Service::Flight, flights),
            SectionResult::from_call(Service::Hotel, hotels),
        );
        self.note_degraded("scatter_gather", result.degraded);
        result
    }

    /// v2 search: the v1 fan-out plus a weather forecast.
    pub async fn search_trips_v2(&self, query: &RouteQuery) -> WeatherTripSearch {
        let hits = self.versions.record(ApiVersion::V2);
        tracing::info!(hits, "searchTrips v2");

        let budget = self.settings.standard_budget;
        let hotel_query = HotelQuery::for_destination(&query.to);

        let (flights, hotels, weather) = tokio::join!(
            self.call(Service::Flight, budget, self.client.search_flights(query)),
            self.call(Service::Hotel, budget, self.client.search_hotels(&hotel_query)),
            self.call(Service::Weather, budget, self.client.forecast(query)),
        );

        let result = WeatherTripSearch::new(
            SectionResult::from_call(Service::Flight, flights),
            SectionResult::from_call(Service::Hotel, hotels),
            SectionResult::from_call(Service::Weather, weather),
        );
        self.note_degraded("versioned_gather", result.degraded);
        result
    }
}
