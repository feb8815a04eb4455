use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{BookingIntentRequest, CreateAppointmentRequest};
use crate::api::dtos::responses::BusySlotResponse;
use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
use crate::domain::models::intent::PendingBookingIntent;
use crate::domain::models::interval::Interval;
use crate::domain::services::availability;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("Invalid instant '{}', expected ISO-8601", raw)))
}

/// Books a slot. The free/booked view a client saw earlier is a hint
/// only; availability is recomputed here, at commit time, and the store
/// commits atomically.
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_appointment: doctor {}", payload.doctor);

    let doctor = state.doctor_repo.find_by_id(&payload.doctor).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;

    if payload.patient_name.trim().is_empty() {
        return Err(AppError::Validation("patientName is required".into()));
    }
    if payload.patient_email.trim().is_empty() {
        return Err(AppError::Validation("patientEmail is required".into()));
    }

    let start = parse_instant(&payload.start)?;
    let explicit_end = payload.end.as_deref().map(parse_instant).transpose()?;
    if let Some(end) = explicit_end
        && end <= start
    {
        return Err(AppError::Validation("end must be after start".into()));
    }

    let date = start.date_naive();
    let rules = state.rule_repo.list_by_doctor(&doctor.id).await?;
    let candidates = availability::slots_for_date(&doctor.id, &rules, date);

    // End resolution: an explicit end wins, then the matching candidate
    // slot's own duration, then the configured default.
    let end = explicit_end
        .or_else(|| candidates.iter().find(|s| s.start == start).map(|s| s.end))
        .unwrap_or(start + Duration::minutes(state.config.default_slot_duration_min));

    let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let day_end = day_start + Duration::days(1);
    let existing = state.appointment_repo
        .list_by_range(&doctor.id, day_start, day_end)
        .await?;

    let requested = Interval::new(start, end);
    if existing.iter().any(|a| requested.overlaps(&a.interval())) {
        warn!(
            "Booking rejected: {} - {} overlaps an existing appointment for doctor {}",
            start, end, doctor.id
        );
        return Err(AppError::Conflict("Time slot is already taken".into()));
    }

    let appointment = Appointment::new(NewAppointmentParams {
        doctor_id: doctor.id.clone(),
        start,
        end,
        patient_name: payload.patient_name,
        patient_email: payload.patient_email,
    });

    let created = state.appointment_repo.create_if_free(&appointment).await?;

    info!("Appointment booked: {} for doctor {}", created.id, doctor.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_repo.list().await?;
    Ok(Json(appointments))
}

/// Busy intervals of one doctor, as consumed by the public profile
/// page. Patient data stays server-side.
pub async fn list_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_repo.find_by_id(&doctor_id).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;

    let appointments = state.appointment_repo.list_by_doctor(&doctor.id).await?;
    let busy: Vec<BusySlotResponse> = appointments
        .into_iter()
        .map(|a| BusySlotResponse { start: a.start_time, end: a.end_time })
        .collect();

    Ok(Json(busy))
}

pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let confirmed = state.appointment_repo.confirm(&appointment_id).await?;
    info!("Appointment confirmed: {}", confirmed.id);
    Ok(Json(confirmed))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.appointment_repo.delete(&appointment_id).await?;
    info!("Appointment deleted: {}", appointment_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

/// Validates a slot selection into a typed intent the client carries
/// through the login redirect and posts back to resume the booking.
pub async fn create_booking_intent(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BookingIntentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_repo.find_by_id(&payload.doctor_id).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;

    let start = parse_instant(&payload.start)?;
    let end = match payload.end.as_deref() {
        Some(raw) => parse_instant(raw)?,
        None => start + Duration::minutes(state.config.default_slot_duration_min),
    };
    if end <= start {
        return Err(AppError::Validation("end must be after start".into()));
    }

    Ok(Json(PendingBookingIntent {
        doctor_id: doctor.id,
        start,
        end,
    }))
}
