//! Per-section results: live data or a placeholder, never both.

use serde::Serialize;

use crate::downstream::{DownstreamError, DownstreamResult, Listing, Service};

/// Why a section holds a placeholder instead of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// The call succeeded with zero results.
    NoData,
    /// The call failed or timed out.
    Unavailable,
    /// The call does not apply to this request.
    NotApplicable,
    /// The call was skipped by an open circuit breaker.
    BreakerOpen,
}

impl PlaceholderKind {
    pub fn is_degraded(self) -> bool {
        matches!(self, PlaceholderKind::Unavailable | PlaceholderKind::BreakerOpen)
    }
}

/// Human-readable stand-in for a section's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub reason: PlaceholderKind,
    pub message: String,
    pub degraded: bool,
}

impl Placeholder {
    pub fn new(reason: PlaceholderKind, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            degraded: reason.is_degraded(),
        }
    }
}

/// One section of an aggregate response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionResult<T> {
    Live(T),
    Placeholder(Placeholder),
}

impl<T> SectionResult<T> {
    pub fn placeholder(reason: PlaceholderKind, message: impl Into<String>) -> Self {
        SectionResult::Placeholder(Placeholder::new(reason, message))
    }

    pub fn not_applicable(message: impl Into<String>) -> Self {
        Self::placeholder(PlaceholderKind::NotApplicable, message)
    }

    pub fn is_degraded(&self) -> bool {
        match self {
            SectionResult::Live(_) => false,
            SectionResult::Placeholder(p) => p.degraded,
        }
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            SectionResult::Live(data) => Some(data),
            SectionResult::Placeholder(_) => None,
        }
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            SectionResult::Live(_) => None,
            SectionResult::Placeholder(p) => Some(p),
        }
    }
}

impl<T: Listing> SectionResult<T> {
    /// Convert a settled call into a section.
    ///
    /// Empty payloads become a non-degraded "no data" placeholder; any
    /// failure becomes a degraded one.
    pub fn from_call(service: Service, result: DownstreamResult<T>) -> Self {
        match result {
            Ok(payload) if payload.is_empty() => {
                Self::placeholder(PlaceholderKind::NoData, service.empty_message())
            }
            Ok(payload) => SectionResult::Live(payload),
            Err(DownstreamError::BreakerOpen { .. }) => Self::placeholder(
                PlaceholderKind::BreakerOpen,
                format!("{} (circuit breaker open)", service.unavailable_message()),
            ),
            Err(e) => {
                tracing::warn!(service = %service, error = %e, "Section degraded");
                Self::placeholder(PlaceholderKind::Unavailable, service.unavailable_message())
            }
        }
    }
}
