//! Branching search: events are only fetched for coastal destinations.

use crate::downstream::{HotelQuery, RouteQuery, Service};
use crate::orchestration::aggregator::Aggregator;
use crate::orchestration::results::ContextualTrip;
use crate::orchestration::section::SectionResult;

impl Aggregator {
    pub async fn contextual_trip(&self, query: &RouteQuery) -> ContextualTrip {
        let coastal = self.is_coastal(&query.to);
        let budget = self.settings.standard_budget;
        let hotel_query = HotelQuery::for_destination(&query.to);

        // The optional branch settles on its own; its failure never touches
        // the base sections and theirs never touch it.
        let events = async {
            if coastal {
                Some(
                    self.call(Service::Events, budget, self.client.search_events(query))
                        .await,
                )
            } else {
                None
            }
        };

        let (flights, hotels, events) = tokio::join!(
            self.call(Service::Flight, budget, self.client.search_flights(query)),
            self.call(Service::Hotel, budget, self.client.search_hotels(&hotel_query)),
            events,
        );

        let events = match events {
            Some(result) => SectionResult::from_call(Service::Events, result),
            None => {
                tracing::info!(destination = %query.to, "Destination is inland, skipping events-service");
                SectionResult::not_applicable("No events for inland destinations")
            }
        };

        let result = ContextualTrip::new(
            SectionResult::from_call(Service::Flight, flights),
            SectionResult::from_call(Service::Hotel, hotels),
            events,
        );
        self.note_degraded("branch", result.degraded);
        result
    }
}
