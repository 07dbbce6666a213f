//! Query parameters and payload shapes exchanged with downstream services.
//!
//! Payloads keep every field the services send: only the fields the
//! orchestration logic reads are named, the rest are carried through in
//! flattened maps so callers see the full upstream response. Nothing is
//! decoded more strictly than the logic that reads it needs.

use chrono::{DateTime, Local, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Route parameters of an inbound query. Each call uses the ones it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteQuery {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub date: String,
}

impl RouteQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            date: date.into(),
        }
    }
}

/// Parameters of a hotel search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelQuery {
    pub destination: String,
    pub late_check_in: Option<bool>,
    pub date: Option<String>,
}

impl HotelQuery {
    pub fn for_destination(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_late_check_in(mut self, late: bool) -> Self {
        self.late_check_in = Some(late);
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// A payload that can be successful yet carry no business results.
pub trait Listing {
    fn is_empty(&self) -> bool;
}

/// The flight picked by the cheapest-flight lookup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrive_time: Option<Value>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Flight {
    /// Hour of arrival.
    ///
    /// Timestamps with an offset use the hour in that offset; timestamps
    /// without one are taken as local wall time; numbers are epoch millis.
    /// `None` when the field is missing or unreadable.
    pub fn arrival_hour(&self) -> Option<u32> {
        match self.arrive_time.as_ref()? {
            Value::String(raw) => {
                let raw = raw.trim();
                if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
                    return Some(at.hour());
                }
                NAIVE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                    .map(|at| at.hour())
            }
            Value::Number(millis) => millis
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|at| at.with_timezone(&Local).hour()),
            _ => None,
        }
    }

    /// Whether the arrival falls in the late window (20:00 to 06:59).
    pub fn arrives_late(&self) -> bool {
        self.arrival_hour()
            .map(|hour| hour >= 20 || hour <= 6)
            .unwrap_or(false)
    }
}

/// Flight search results, passed through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlightSearch {
    #[serde(default)]
    pub flights: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing for FlightSearch {
    fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheapestFlight {
    pub flight: Flight,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing for CheapestFlight {
    fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelSearch {
    #[serde(default)]
    pub hotels: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing for HotelSearch {
    fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventSearch {
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing for EventSearch {
    fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Weather forecast summary. Always treated as live data when returned.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Forecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Listing for Forecast {
    fn is_empty(&self) -> bool {
        false
    }
}
