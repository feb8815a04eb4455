use chrono::{DateTime, Utc};
use serde::Serialize;

/// Half-open time interval `[start, end)` over absolute instants.
///
/// Every overlap decision in the crate goes through [`Interval::overlaps`];
/// the repositories' `start_time < ? AND end_time > ?` SQL is the same
/// predicate pushed into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// An interval ending exactly where another begins does not conflict.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}
