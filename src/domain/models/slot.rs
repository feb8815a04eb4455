use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::domain::models::interval::Interval;

/// A concrete bookable opening derived from a doctor's rules.
/// Never persisted; identity is the `(doctor_id, start)` pair.
#[derive(Debug, Serialize, Clone)]
pub struct Slot {
    pub doctor_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_min: i32,
}

impl Slot {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Booked,
}

/// Read-side projection of a slot against the appointment book.
#[derive(Debug, Serialize, Clone)]
pub struct TaggedSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_min: i32,
    pub status: SlotStatus,
}
