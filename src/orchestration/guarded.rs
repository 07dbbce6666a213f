//! Breaker-guarded search: flights and hotels run unguarded, the weather
//! call goes through the circuit breaker.

use std::sync::Arc;
use std::time::Duration;

use crate::downstream::{DownstreamError, DownstreamResult, Forecast, HotelQuery, RouteQuery, Service};
use crate::observability::metrics;
use crate::orchestration::aggregator::{budgeted_call, Aggregator};
use crate::orchestration::results::WeatherTripSearch;
use crate::orchestration::section::SectionResult;
use crate::resilience::Outcome;

impl Aggregator {
    pub async fn search_trips_guarded(&self, query: &RouteQuery) -> WeatherTripSearch {
        tracing::info!("[v2-cb] searchTrips started");

        let budget = self.settings.guarded_budget;
        let hotel_query = HotelQuery::for_destination(&query.to).with_date(&query.date);

        let (flights, hotels, weather) = tokio::join!(
            self.call(Service::Flight, budget, self.client.search_flights(query)),
            self.call(Service::Hotel, budget, self.client.search_hotels(&hotel_query)),
            self.guarded_forecast(query, budget),
        );

        let result = WeatherTripSearch::new(
            SectionResult::from_call(Service::Flight, flights),
            SectionResult::from_call(Service::Hotel, hotels),
            SectionResult::from_call(Service::Weather, weather),
        );
        self.note_degraded("breaker_guarded_gather", result.degraded);
        result
    }

    async fn guarded_forecast(&self, query: &RouteQuery, budget: Duration) -> DownstreamResult<Forecast> {
        let breaker = &self.breaker;
        tracing::debug!(state = %breaker.state(), "[CB] consulting breaker");

        if !breaker.allow_request() {
            tracing::warn!("[CB] is OPEN - skipping weather call");
            // A skipped call still counts as a failure so the window keeps
            // moving during an outage.
            breaker.push_outcome(Outcome::Failure);
            metrics::record_downstream_call(Service::Weather.name(), "breaker_open", std::time::Instant::now());
            return Err(DownstreamError::BreakerOpen {
                service: Service::Weather,
            });
        }

        // Call and recording run as one task so the outcome still lands in
        // the breaker when the inbound request is dropped mid-call.
        let client = Arc::clone(&self.client);
        let breaker = Arc::clone(&self.breaker);
        let query = query.clone();
        let guarded = tokio::spawn(async move {
            let result = budgeted_call(Service::Weather, budget, client.forecast(&query)).await;

            let success = result.is_ok();
            breaker.push_outcome(if success { Outcome::Success } else { Outcome::Failure });
            breaker.on_probe_result(success);

            tracing::debug!(success, state = %breaker.state(), "[CB] weather outcome recorded");
            result
        });

        guarded.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Guarded weather task failed");
            Err(DownstreamError::unavailable(Service::Weather, e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BreakerConfig;
    use crate::orchestration::aggregator::AggregatorSettings;
    use crate::orchestration::section::PlaceholderKind;
    use crate::orchestration::testing::{Behavior, FakeClient};
    use crate::resilience::{BreakerState, CircuitBreaker, ManualClock};

    use super::*;

    struct Harness {
        aggregator: Aggregator,
        client: Arc<FakeClient>,
        breaker: Arc<CircuitBreaker>,
        clock: Arc<ManualClock>,
    }

    fn harness(client: FakeClient) -> Harness {
        let client = Arc::new(client);
        let clock = Arc::new(ManualClock::new());
        let breaker = Arc::new(CircuitBreaker::with_clock(
            "weather-service",
            BreakerConfig::default(),
            clock.clone(),
        ));
        let settings = AggregatorSettings {
            guarded_budget: Duration::from_millis(100),
            ..AggregatorSettings::default()
        };
        Harness {
            aggregator: Aggregator::new(client.clone(), breaker.clone(), settings),
            client,
            breaker,
            clock,
        }
    }

    fn query() -> RouteQuery {
        RouteQuery::new("CMB", "BKK", "2025-03-01")
    }

    fn trip_open(breaker: &CircuitBreaker) {
        for _ in 0..breaker.config().window_size {
            breaker.push_outcome(Outcome::Failure);
        }
        assert_eq!(breaker.state(), BreakerState::Open);
    }

    #[tokio::test]
    async fn test_success_records_success_outcome() {
        let h = harness(FakeClient::healthy());
        let result = h.aggregator.search_trips_guarded(&query()).await;

        assert!(!result.degraded);
        assert!(result.weather.live().is_some());
        assert_eq!(h.breaker.status().outcomes, vec![Outcome::Success]);
        assert_eq!(
            h.client.hotel_queries()[0],
            HotelQuery::for_destination("BKK").with_date("2025-03-01")
        );
    }

    #[tokio::test]
    async fn test_failure_records_failure_outcome() {
        let h = harness(FakeClient::healthy().with_weather(Behavior::Hang));
        let result = h.aggregator.search_trips_guarded(&query()).await;

        assert!(result.degraded);
        assert!(!result.flights.is_degraded());
        assert_eq!(
            result.weather.as_placeholder().unwrap().reason,
            PlaceholderKind::Unavailable
        );
        assert_eq!(h.breaker.status().outcomes, vec![Outcome::Failure]);
    }

    #[tokio::test]
    async fn test_open_breaker_skips_call_and_records_synthetic_failure() {
        let h = harness(FakeClient::healthy());
        for _ in 0..6 {
            h.breaker.push_outcome(Outcome::Failure);
        }
        for _ in 0..4 {
            h.breaker.push_outcome(Outcome::Success);
        }
        assert_eq!(h.breaker.state(), BreakerState::Open);
        let before = h.breaker.status().outcomes;

        let result = h.aggregator.search_trips_guarded(&query()).await;

        assert!(result.degraded);
        assert_eq!(h.client.weather_calls(), 0);
        let weather = result.weather.as_placeholder().unwrap();
        assert_eq!(weather.reason, PlaceholderKind::BreakerOpen);
        assert_eq!(weather.message, "Weather data unavailable (circuit breaker open)");

        let mut expected = before[1..].to_vec();
        expected.push(Outcome::Failure);
        assert_eq!(h.breaker.status().outcomes, expected);

        // Base sections are untouched by the breaker.
        assert!(result.flights.live().is_some());
        assert!(result.hotels.live().is_some());
    }

    #[tokio::test]
    async fn test_half_open_successes_close_the_breaker() {
        let h = harness(FakeClient::healthy());
        trip_open(&h.breaker);

        h.clock.advance(Duration::from_millis(20_001));
        // The skipped call's synthetic outcome is what moves the breaker on.
        let skipped = h.aggregator.search_trips_guarded(&query()).await;
        assert!(skipped.weather.is_degraded());
        assert_eq!(h.breaker.state(), BreakerState::HalfOpen);

        for _ in 0..3 {
            h.aggregator.search_trips_guarded(&query()).await;
            assert_eq!(h.breaker.state(), BreakerState::HalfOpen);
        }
        h.aggregator.search_trips_guarded(&query()).await;
        assert_eq!(h.breaker.state(), BreakerState::Closed);
        assert!(h.breaker.status().outcomes.is_empty());
        assert_eq!(h.client.weather_calls(), 4);
    }

    #[tokio::test]
    async fn test_outcome_recorded_after_caller_gives_up() {
        let slow = Behavior::Slow(Duration::from_millis(40), serde_json::json!({ "summary": "Rain" }));
        let h = harness(FakeClient::healthy().with_weather(slow));
        trip_open(&h.breaker);
        h.clock.advance(Duration::from_millis(20_001));
        h.aggregator.search_trips_guarded(&query()).await;
        assert_eq!(h.breaker.state(), BreakerState::HalfOpen);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            h.aggregator.search_trips_guarded(&query()),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;
        let status = h.breaker.status();
        assert_eq!(status.half_open_probes, 1);
        assert_eq!(status.half_open_successes, 1);
        assert_eq!(status.outcomes.last(), Some(&Outcome::Success));
        assert_eq!(h.client.weather_calls(), 1);
    }

    #[tokio::test]
    async fn test_half_open_failures_reopen_the_breaker() {
        let h = harness(FakeClient::healthy().with_weather(Behavior::Fail));
        trip_open(&h.breaker);
        h.clock.advance(Duration::from_millis(20_001));
        h.aggregator.search_trips_guarded(&query()).await;
        assert_eq!(h.breaker.state(), BreakerState::HalfOpen);

        for _ in 0..4 {
            h.aggregator.search_trips_guarded(&query()).await;
            assert_eq!(h.breaker.state(), BreakerState::HalfOpen);
        }
        h.aggregator.search_trips_guarded(&query()).await;
        assert_eq!(h.breaker.state(), BreakerState::Open);
        assert_eq!(h.client.weather_calls(), 5);
    }
}
