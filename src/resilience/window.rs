//! Fixed-capacity outcome window.
//!
//! A ring buffer of the most recent call outcomes. Pushing into a full
//! window evicts the oldest entry in O(1), and the failure count is kept
//! alongside so the failure rate never needs a scan.

use std::collections::VecDeque;

use serde::Serialize;

/// Result of one guarded call, as seen by the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::Failure)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeWindow {
    buf: VecDeque<Outcome>,
    capacity: usize,
    failures: usize,
}

impl OutcomeWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
            failures: 0,
        }
    }

    /// Append an outcome, evicting the oldest once capacity is exceeded.
    pub fn push(&mut self, outcome: Outcome) {
        if self.capacity == 0 {
            return;
        }
        if self.buf.len() == self.capacity {
            if let Some(evicted) = self.buf.pop_front() {
                if evicted.is_failure() {
                    self.failures -= 1;
                }
            }
        }
        if outcome.is_failure() {
            self.failures += 1;
        }
        self.buf.push_back(outcome);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.failures = 0;
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Failures over the current length; zero for an empty window.
    pub fn failure_rate(&self) -> f64 {
        if self.buf.is_empty() {
            0.0
        } else {
            self.failures as f64 / self.buf.len() as f64
        }
    }

    /// Oldest first.
    pub fn to_vec(&self) -> Vec<Outcome> {
        self.buf.iter().copied().collect()
    }
}
