//! Shared utilities for integration testing: mock downstream services and a
//! running aggregator on ephemeral ports.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use trip_aggregator::config::AggregatorConfig;
use trip_aggregator::http::HttpServer;
use trip_aggregator::lifecycle::Shutdown;

/// How a mock endpoint answers.
#[derive(Clone)]
pub enum Mock {
    Json(Value),
    Status(u16),
    Slow(Duration, Value),
}

/// A running mock service with per-service call bookkeeping.
pub struct MockService {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockService {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }
}

/// Start a mock service answering each `(path, mock)` pair.
pub async fn start_service(routes: Vec<(&'static str, Mock)>) -> MockService {
    let hits = Arc::new(AtomicUsize::new(0));
    let queries = Arc::new(Mutex::new(Vec::new()));

    let mut router = Router::new();
    for (path, mock) in routes {
        let hits = hits.clone();
        let queries = queries.clone();
        router = router.route(
            path,
            get(move |Query(params): Query<HashMap<String, String>>| {
                let mock = mock.clone();
                let hits = hits.clone();
                let queries = queries.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    queries.lock().unwrap().push(params);
                    match mock {
                        Mock::Json(body) => (StatusCode::OK, Json(body)),
                        Mock::Status(code) => (
                            StatusCode::from_u16(code).unwrap(),
                            Json(json!({ "error": "injected failure" })),
                        ),
                        Mock::Slow(delay, body) => {
                            tokio::time::sleep(delay).await;
                            (StatusCode::OK, Json(body))
                        }
                    }
                }
            }),
        );
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    MockService {
        addr,
        hits,
        queries,
    }
}

pub fn flights() -> Value {
    json!({ "flights": [{ "id": "FL100", "price": 310, "carrier": "UL" }] })
}

pub fn cheapest(arrive_time: &str) -> Value {
    json!({ "flight": { "id": "FL7", "price": 199, "arriveTime": arrive_time } })
}

pub fn hotels() -> Value {
    json!({ "hotels": [{ "name": "Harbour Inn", "stars": 4 }] })
}

pub fn events() -> Value {
    json!({ "events": [{ "title": "Night Market" }] })
}

pub fn weather() -> Value {
    json!({ "summary": "Sunny", "highC": 31 })
}

/// The four downstream services, healthy unless overridden.
pub struct Downstream {
    pub flight: MockService,
    pub hotel: MockService,
    pub events: MockService,
    pub weather: MockService,
}

pub struct DownstreamBuilder {
    flight_search: Mock,
    flight_cheapest: Mock,
    hotel: Mock,
    events: Mock,
    weather: Mock,
}

impl DownstreamBuilder {
    pub fn healthy() -> Self {
        Self {
            flight_search: Mock::Json(flights()),
            flight_cheapest: Mock::Json(cheapest("2025-03-01T22:30:00+07:00")),
            hotel: Mock::Json(hotels()),
            events: Mock::Json(events()),
            weather: Mock::Json(weather()),
        }
    }

    pub fn flight_search(mut self, mock: Mock) -> Self {
        self.flight_search = mock;
        self
    }

    pub fn flight_cheapest(mut self, mock: Mock) -> Self {
        self.flight_cheapest = mock;
        self
    }

    pub fn hotel(mut self, mock: Mock) -> Self {
        self.hotel = mock;
        self
    }

    pub fn events(mut self, mock: Mock) -> Self {
        self.events = mock;
        self
    }

    pub fn weather(mut self, mock: Mock) -> Self {
        self.weather = mock;
        self
    }

    pub async fn start(self) -> Downstream {
        Downstream {
            flight: start_service(vec![
                ("/flights/search", self.flight_search),
                ("/flights/cheapest", self.flight_cheapest),
            ])
            .await,
            hotel: start_service(vec![("/hotel/search", self.hotel)]).await,
            events: start_service(vec![("/events/search", self.events)]).await,
            weather: start_service(vec![("/weather/forecast", self.weather)]).await,
        }
    }
}

/// Aggregator config pointing at `downstream`, with short call budgets.
pub fn config_for(downstream: &Downstream) -> AggregatorConfig {
    let mut config = AggregatorConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.services.flight_url = downstream.flight.url();
    config.services.hotel_url = downstream.hotel.url();
    config.services.events_url = downstream.events.url();
    config.services.weather_url = downstream.weather.url();
    config.timeouts.standard_ms = 300;
    config.timeouts.breaker_guarded_ms = 300;
    config
}

/// A running aggregator; dropping it does not stop the server, call `stop`.
pub struct RunningAggregator {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningAggregator {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

pub async fn start_aggregator(config: AggregatorConfig) -> RunningAggregator {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    RunningAggregator { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub async fn get_json(url: &str) -> (u16, Value) {
    let res = client().get(url).send().await.expect("aggregator unreachable");
    let status = res.status().as_u16();
    (status, res.json().await.unwrap_or(Value::Null))
}
