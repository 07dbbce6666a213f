//! Scripted in-memory downstream client for strategy tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::downstream::{
    CheapestFlight, DownstreamClient, DownstreamError, DownstreamResult, EventSearch, FlightSearch,
    Forecast, HotelQuery, HotelSearch, RouteQuery, Service,
};

/// How one scripted operation answers.
#[derive(Debug, Clone)]
pub enum Behavior {
    Reply(Value),
    Fail,
    Hang,
    Slow(Duration, Value),
    Panic(&'static str),
}

#[derive(Debug, Default)]
struct Calls {
    flights: AtomicUsize,
    cheapest: AtomicUsize,
    hotels: AtomicUsize,
    events: AtomicUsize,
    weather: AtomicUsize,
}

#[derive(Debug)]
pub struct FakeClient {
    flights: Behavior,
    cheapest: Behavior,
    hotels: Behavior,
    events: Behavior,
    weather: Behavior,
    calls: Calls,
    hotel_queries: Mutex<Vec<HotelQuery>>,
}

impl FakeClient {
    /// Every service answers with one result.
    pub fn healthy() -> Self {
        Self {
            flights: Behavior::Reply(json!({ "flights": [{ "id": "FL100", "price": 310 }] })),
            cheapest: Behavior::Reply(json!({
                "flight": { "id": "FL7", "arriveTime": "2025-03-01T22:30:00+07:00", "price": 199 }
            })),
            hotels: Behavior::Reply(json!({ "hotels": [{ "name": "Harbour Inn" }] })),
            events: Behavior::Reply(json!({ "events": [{ "title": "Night Market" }] })),
            weather: Behavior::Reply(json!({ "summary": "Sunny", "highC": 31 })),
            calls: Calls::default(),
            hotel_queries: Mutex::new(Vec::new()),
        }
    }

    /// Every service answers successfully with nothing in it.
    pub fn empty() -> Self {
        Self {
            flights: Behavior::Reply(json!({ "flights": [] })),
            hotels: Behavior::Reply(json!({ "hotels": [] })),
            events: Behavior::Reply(json!({ "events": [] })),
            ..Self::healthy()
        }
    }

    pub fn with_flights(mut self, behavior: Behavior) -> Self {
        self.flights = behavior;
        self
    }

    pub fn with_cheapest(mut self, behavior: Behavior) -> Self {
        self.cheapest = behavior;
        self
    }

    pub fn with_hotels(mut self, behavior: Behavior) -> Self {
        self.hotels = behavior;
        self
    }

    pub fn with_events(mut self, behavior: Behavior) -> Self {
        self.events = behavior;
        self
    }

    pub fn with_weather(mut self, behavior: Behavior) -> Self {
        self.weather = behavior;
        self
    }

    pub fn flight_calls(&self) -> usize {
        self.calls.flights.load(Ordering::SeqCst)
    }

    pub fn cheapest_calls(&self) -> usize {
        self.calls.cheapest.load(Ordering::SeqCst)
    }

    pub fn hotel_calls(&self) -> usize {
        self.calls.hotels.load(Ordering::SeqCst)
    }

    pub fn event_calls(&self) -> usize {
        self.calls.events.load(Ordering::SeqCst)
    }

    pub fn weather_calls(&self) -> usize {
        self.calls.weather.load(Ordering::SeqCst)
    }

    pub fn hotel_queries(&self) -> Vec<HotelQuery> {
        self.hotel_queries.lock().unwrap().clone()
    }
}

async fn respond<T: DeserializeOwned>(service: Service, behavior: &Behavior) -> DownstreamResult<T> {
    match behavior {
        Behavior::Reply(body) => serde_json::from_value(body.clone())
            .map_err(|e| DownstreamError::unavailable(service, e.to_string())),
        Behavior::Fail => Err(DownstreamError::unavailable(service, "connection refused")),
        Behavior::Hang => std::future::pending().await,
        Behavior::Slow(delay, body) => {
            tokio::time::sleep(*delay).await;
            serde_json::from_value(body.clone())
                .map_err(|e| DownstreamError::unavailable(service, e.to_string()))
        }
        Behavior::Panic(message) => panic!("{}", message),
    }
}

#[async_trait]
impl DownstreamClient for FakeClient {
    async fn search_flights(&self, _query: &RouteQuery) -> DownstreamResult<FlightSearch> {
        self.calls.flights.fetch_add(1, Ordering::SeqCst);
        respond(Service::Flight, &self.flights).await
    }

    async fn cheapest_flight(&self, _query: &RouteQuery) -> DownstreamResult<CheapestFlight> {
        self.calls.cheapest.fetch_add(1, Ordering::SeqCst);
        respond(Service::Flight, &self.cheapest).await
    }

    async fn search_hotels(&self, query: &HotelQuery) -> DownstreamResult<HotelSearch> {
        self.calls.hotels.fetch_add(1, Ordering::SeqCst);
        self.hotel_queries.lock().unwrap().push(query.clone());
        respond(Service::Hotel, &self.hotels).await
    }

    async fn search_events(&self, _query: &RouteQuery) -> DownstreamResult<EventSearch> {
        self.calls.events.fetch_add(1, Ordering::SeqCst);
        respond(Service::Events, &self.events).await
    }

    async fn forecast(&self, _query: &RouteQuery) -> DownstreamResult<Forecast> {
        self.calls.weather.fetch_add(1, Ordering::SeqCst);
        respond(Service::Weather, &self.weather).await
    }
}
