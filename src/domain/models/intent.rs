use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A booking intent carried explicitly through the authentication
/// round-trip: the caller receives it before redirecting to login and
/// posts it back unchanged to resume the booking. Replaces ambient
/// client-side storage of the pending selection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingBookingIntent {
    pub doctor_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
