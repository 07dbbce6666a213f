//! Route handlers. Each one delegates to a single aggregator operation and
//! always answers 200 with the aggregate; degradation is in the body.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::downstream::RouteQuery;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::orchestration::{CheapestRoute, ContextualTrip, TripSearch, VersionStats, WeatherTripSearch};
use crate::resilience::BreakerStatus;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn search_trips(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<TripSearch> {
    let start = Instant::now();
    let result = state.aggregator.search_trips(&query).await;
    metrics::record_request("/v1/trips/search", 200, start);
    Json(result)
}

pub async fn cheapest_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<CheapestRoute> {
    let start = Instant::now();
    let result = state.aggregator.cheapest_route(&query).await;
    metrics::record_request("/v1/trips/cheapest-route", 200, start);
    Json(result)
}

pub async fn contextual_trip(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<ContextualTrip> {
    let start = Instant::now();
    let result = state.aggregator.contextual_trip(&query).await;
    metrics::record_request("/v1/trips/contextual", 200, start);
    Json(result)
}

pub async fn search_trips_v2(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<WeatherTripSearch> {
    let start = Instant::now();
    let result = state.aggregator.search_trips_v2(&query).await;
    metrics::record_request("/v2/trips/search", 200, start);
    Json(result)
}

pub async fn search_trips_guarded(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<WeatherTripSearch> {
    let start = Instant::now();
    let result = state.aggregator.search_trips_guarded(&query).await;
    metrics::record_request("/v2-cb/trips/search", 200, start);
    Json(result)
}

pub async fn breaker_status(State(state): State<AppState>) -> Json<BreakerStatus> {
    Json(state.aggregator.breaker_status())
}

pub async fn version_stats(State(state): State<AppState>) -> Json<VersionStats> {
    Json(state.aggregator.version_stats())
}
