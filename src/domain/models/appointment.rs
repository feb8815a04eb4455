use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::interval::Interval;

/// A persisted booking. `start_time`/`end_time` are never mutated after
/// creation; rescheduling is modeled as delete + recreate. Both
/// `PENDING` and `CONFIRMED` appointments block their interval.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub doctor_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub patient_name: String,
    pub patient_email: String,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            doctor_id: params.doctor_id,
            patient_name: params.patient_name,
            patient_email: params.patient_email,
            start_time: params.start,
            end_time: params.end,
            status: "PENDING".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}
