//! API version traffic counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn label(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

/// Process-lifetime hit counters, one per API version.
#[derive(Debug, Default)]
pub struct VersionCounters {
    v1: AtomicU64,
    v2: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStats {
    pub v1_hits: u64,
    pub v2_hits: u64,
}

impl VersionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one hit and return the new total for that version.
    pub fn record(&self, version: ApiVersion) -> u64 {
        let counter = match version {
            ApiVersion::V1 => &self.v1,
            ApiVersion::V2 => &self.v2,
        };
        metrics::record_version_hit(version.label());
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn snapshot(&self) -> VersionStats {
        VersionStats {
            v1_hits: self.v1.load(Ordering::Relaxed),
            v2_hits: self.v2.load(Ordering::Relaxed),
        }
    }
}
