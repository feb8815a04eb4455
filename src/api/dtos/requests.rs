use serde::Deserialize;

/// Rule shape as persisted and as posted by the admin form:
/// `{type, dayOfWeek, startTime, endTime, duration, date?}`.
#[derive(Deserialize, Clone)]
pub struct AvailabilityRuleRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: Option<i32>,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub duration: i32,
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
    #[serde(rename = "availabilitySlots", default)]
    pub availability: Vec<AvailabilityRuleRequest>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor: String,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    #[serde(rename = "patientEmail")]
    pub patient_email: String,
    pub start: String,
    pub end: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingIntentRequest {
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    pub start: String,
    pub end: Option<String>,
}
