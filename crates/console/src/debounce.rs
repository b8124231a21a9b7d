//! Debounced values.
//!
//! [`Debounced`] holds a settled value and at most one pending value. A new
//! input restarts the wait; the pending value becomes the settled one only
//! after the delay has passed without further input. Time is passed in by
//! the caller, so the type does no I/O.

use std::time::{Duration, Instant};

/// Delay applied to the search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
        }
    }

    /// Record an input made at `now`.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Settle the pending value if its deadline has passed. Returns whether
    /// the settled value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => {
                let changed = value != self.settled;
                self.settled = value;
                changed
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    pub fn value(&self) -> &T {
        &self.settled
    }

    /// When the pending value will settle, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}
