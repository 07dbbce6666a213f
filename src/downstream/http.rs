//! reqwest-backed downstream client.
//!
//! # Responsibilities
//! - Build request URLs against the configured service base URLs
//! - Map non-2xx statuses and undecodable bodies to `Unavailable`
//! - Leave deadlines to the caller (the timeout guard drops the future,
//!   which aborts the in-flight request)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ServicesConfig;
use crate::downstream::client::DownstreamClient;
use crate::downstream::error::{DownstreamError, DownstreamResult, Service};
use crate::downstream::types::{
    CheapestFlight, EventSearch, FlightSearch, Forecast, HotelQuery, HotelSearch, RouteQuery,
};

/// Errors raised while building the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid base URL for {service}: {source}")]
    BaseUrl {
        service: Service,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the flight, hotel, events and weather services.
#[derive(Clone)]
pub struct HttpDownstream {
    client: Client,
    flight: Url,
    hotel: Url,
    events: Url,
    weather: Url,
}

impl HttpDownstream {
    pub fn new(services: &ServicesConfig, connect_timeout: Duration) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            flight: parse_base(Service::Flight, &services.flight_url)?,
            hotel: parse_base(Service::Hotel, &services.hotel_url)?,
            events: parse_base(Service::Events, &services.events_url)?,
            weather: parse_base(Service::Weather, &services.weather_url)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        base: &Url,
        path: &str,
        params: &[(&str, &str)],
    ) -> DownstreamResult<T> {
        let url = base
            .join(path)
            .map_err(|e| DownstreamError::unavailable(service, e.to_string()))?;

        tracing::debug!(service = %service, url = %url, "Calling downstream service");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| DownstreamError::unavailable(service, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownstreamError::unavailable(
                service,
                format!("unexpected status {}", status),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DownstreamError::unavailable(service, format!("invalid payload: {}", e)))
    }
}

fn parse_base(service: Service, raw: &str) -> Result<Url, ClientBuildError> {
    Url::parse(raw).map_err(|source| ClientBuildError::BaseUrl { service, source })
}

#[async_trait]
impl DownstreamClient for HttpDownstream {
    async fn search_flights(&self, query: &RouteQuery) -> DownstreamResult<FlightSearch> {
        let params = [
            ("from", query.from.as_str()),
            ("to", query.to.as_str()),
            ("date", query.date.as_str()),
        ];
        self.get_json(Service::Flight, &self.flight, "flights/search", &params)
            .await
    }

    async fn cheapest_flight(&self, query: &RouteQuery) -> DownstreamResult<CheapestFlight> {
        let params = [
            ("from", query.from.as_str()),
            ("to", query.to.as_str()),
            ("date", query.date.as_str()),
        ];
        self.get_json(Service::Flight, &self.flight, "flights/cheapest", &params)
            .await
    }

    async fn search_hotels(&self, query: &HotelQuery) -> DownstreamResult<HotelSearch> {
        let late = query.late_check_in.map(|late| late.to_string());

        let mut params = vec![("to", query.destination.as_str())];
        if let Some(late) = late.as_deref() {
            params.push(("late", late));
        }
        if let Some(date) = query.date.as_deref() {
            params.push(("date", date));
        }
        self.get_json(Service::Hotel, &self.hotel, "hotel/search", &params)
            .await
    }

    async fn search_events(&self, query: &RouteQuery) -> DownstreamResult<EventSearch> {
        let params = [("to", query.to.as_str()), ("date", query.date.as_str())];
        self.get_json(Service::Events, &self.events, "events/search", &params)
            .await
    }

    async fn forecast(&self, query: &RouteQuery) -> DownstreamResult<Forecast> {
        let params = [("city", query.to.as_str()), ("date", query.date.as_str())];
        self.get_json(Service::Weather, &self.weather, "weather/forecast", &params)
            .await
    }
}
