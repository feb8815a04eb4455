use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

/// A doctor-declared availability window. `kind` is `"date"` (one
/// calendar date, `date` authoritative) or `"weekly"` (recurring
/// day-of-week, Sunday = 0). Times are stored as `"HH:MM"` text.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityRule {
    pub id: String,
    pub doctor_id: String,
    pub kind: String,
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
}

pub struct NewRuleParams {
    pub doctor_id: String,
    pub kind: String,
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub duration_min: i32,
}

pub struct RuleWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_min: i32,
}

impl AvailabilityRule {
    pub fn new(params: NewRuleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            doctor_id: params.doctor_id,
            kind: params.kind,
            day_of_week: params.day_of_week,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            duration_min: params.duration_min,
            created_at: Utc::now(),
        }
    }

    /// Parses the stored window. Returns `None` for rows violating the
    /// rule invariants (unparseable time text, start >= end,
    /// non-positive duration); the generator skips those rows instead
    /// of failing the whole query.
    pub fn window(&self) -> Option<RuleWindow> {
        let start = NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()?;

        if start >= end || self.duration_min <= 0 {
            return None;
        }

        Some(RuleWindow {
            start,
            end,
            duration_min: self.duration_min,
        })
    }
}
