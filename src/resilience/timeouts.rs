//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race a dependency call against its deadline
//! - Tag timeout failures with the dependency that missed the deadline
//! - Cancel the in-flight call on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - The losing future is dropped, which aborts the underlying request
//!   instead of leaving it running in the background

use std::future::Future;
use std::time::Duration;

use crate::downstream::{DownstreamError, DownstreamResult, Service};

/// Resolve to the call's own result, or to `Timeout` if `budget` elapses first.
pub async fn with_timeout<T, F>(service: Service, budget: Duration, call: F) -> DownstreamResult<T>
where
    F: Future<Output = DownstreamResult<T>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                service = %service,
                budget_ms = budget.as_millis() as u64,
                "Downstream call timed out"
            );
            Err(DownstreamError::Timeout {
                service,
                budget_ms: budget.as_millis() as u64,
            })
        }
    }
}
