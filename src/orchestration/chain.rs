//! Chained lookup: cheapest flight, then hotels shaped by its arrival time.

use crate::downstream::{DownstreamResult, HotelQuery, RouteQuery, Service};
use crate::orchestration::aggregator::Aggregator;
use crate::orchestration::results::{CheapestRoute, PlannedRoute};

impl Aggregator {
    /// Any failure aborts the whole chain; there is no partial payload.
    pub async fn cheapest_route(&self, query: &RouteQuery) -> CheapestRoute {
        match self.plan_cheapest_route(query).await {
            Ok(plan) => CheapestRoute::Planned(plan),
            Err(e) => {
                tracing::warn!(error = %e, "Chaining failed");
                self.note_degraded("chain", true);
                CheapestRoute::aborted(&e)
            }
        }
    }

    async fn plan_cheapest_route(&self, query: &RouteQuery) -> DownstreamResult<PlannedRoute> {
        let budget = self.settings.standard_budget;

        let cheapest = self
            .call(Service::Flight, budget, self.client.cheapest_flight(query))
            .await?;
        let flight = cheapest.flight;
        let late_check_in = flight.arrives_late();
        tracing::info!(flight_id = %flight.id, late_check_in, "Cheapest flight found");

        let hotel_query = HotelQuery::for_destination(&query.to).with_late_check_in(late_check_in);
        let hotels = self
            .call(Service::Hotel, budget, self.client.search_hotels(&hotel_query))
            .await?;

        Ok(PlannedRoute {
            flight,
            hotels: hotels.hotels,
            late_check_in,
            degraded: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use crate::config::BreakerConfig;
    use crate::orchestration::aggregator::AggregatorSettings;
    use crate::orchestration::testing::{Behavior, FakeClient};
    use crate::resilience::CircuitBreaker;

    use super::*;

    fn setup(client: FakeClient) -> (Aggregator, Arc<FakeClient>) {
        let client = Arc::new(client);
        let settings = AggregatorSettings {
            standard_budget: Duration::from_millis(100),
            ..AggregatorSettings::default()
        };
        let breaker = Arc::new(CircuitBreaker::new("weather-service", BreakerConfig::default()));
        (Aggregator::new(client.clone(), breaker, settings), client)
    }

    fn query() -> RouteQuery {
        RouteQuery::new("CMB", "BKK", "2025-03-01")
    }

    #[tokio::test]
    async fn test_late_arrival_requests_late_check_in() {
        let (aggregator, client) = setup(FakeClient::healthy());
        let route = aggregator.cheapest_route(&query()).await;

        let CheapestRoute::Planned(plan) = route else {
            panic!("expected a planned route");
        };
        assert!(plan.late_check_in);
        assert!(!plan.degraded);
        assert_eq!(plan.flight.id, "FL7");
        assert_eq!(plan.hotels, vec![json!({ "name": "Harbour Inn" })]);
        assert_eq!(
            client.hotel_queries(),
            vec![HotelQuery::for_destination("BKK").with_late_check_in(true)]
        );
    }

    #[tokio::test]
    async fn test_daytime_arrival() {
        let client = FakeClient::healthy().with_cheapest(Behavior::Reply(json!({
            "flight": { "id": "FL8", "arriveTime": "2025-03-01T13:05:00+05:30" }
        })));
        let (aggregator, client) = setup(client);

        let route = aggregator.cheapest_route(&query()).await;
        assert!(!route.is_degraded());
        assert_eq!(client.hotel_queries()[0].late_check_in, Some(false));
    }

    #[tokio::test]
    async fn test_flight_failure_skips_hotels() {
        let (aggregator, client) = setup(FakeClient::healthy().with_cheapest(Behavior::Fail));
        let route = aggregator.cheapest_route(&query()).await;

        assert!(route.is_degraded());
        assert!(matches!(route, CheapestRoute::Aborted(_)));
        assert_eq!(client.cheapest_calls(), 1);
        assert_eq!(client.hotel_calls(), 0);
    }

    #[tokio::test]
    async fn test_flight_timeout_skips_hotels() {
        let (aggregator, client) = setup(FakeClient::healthy().with_cheapest(Behavior::Hang));
        let route = aggregator.cheapest_route(&query()).await;

        let CheapestRoute::Aborted(abort) = route else {
            panic!("expected an aborted route");
        };
        assert!(abort.reason.contains("timeout"));
        assert_eq!(client.hotel_calls(), 0);
    }

    #[tokio::test]
    async fn test_hotel_failure_aborts_without_partial_flight() {
        let (aggregator, client) = setup(FakeClient::healthy().with_hotels(Behavior::Fail));
        let route = aggregator.cheapest_route(&query()).await;

        assert_eq!(client.hotel_calls(), 1);
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["degraded"], true);
        assert!(json.get("flight").is_none());
    }
}
