use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Serialize)]
pub struct RuleCreatedResponse {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
}

/// Busy interval as exposed to the public profile page; carries no
/// patient data.
#[derive(Serialize)]
pub struct BusySlotResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
