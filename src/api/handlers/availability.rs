use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::AvailabilityRuleRequest;
use crate::api::dtos::responses::RuleCreatedResponse;
use crate::domain::models::availability_rule::{AvailabilityRule, NewRuleParams};
use crate::domain::models::slot::TaggedSlot;
use crate::domain::services::availability;
use crate::error::AppError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use tracing::info;

/// Validates the posted rule shape and binds it to a doctor. For `date`
/// rules the day-of-week is derived from the date, never taken from the
/// payload.
pub fn build_rule(doctor_id: &str, payload: &AvailabilityRuleRequest) -> Result<AvailabilityRule, AppError> {
    let start = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid startTime format (HH:MM)".into()))?;
    let end = NaiveTime::parse_from_str(&payload.end_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid endTime format (HH:MM)".into()))?;

    if start >= end {
        return Err(AppError::Validation("startTime must be before endTime".into()));
    }
    if payload.duration <= 0 {
        return Err(AppError::Validation("duration must be positive".into()));
    }

    let (date, day_of_week) = match payload.kind.as_str() {
        "date" => {
            let raw = payload.date.as_ref()
                .ok_or(AppError::Validation("date is required for date rules".into()))?;
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))?;
            (Some(date), date.weekday().num_days_from_sunday() as i32)
        }
        "weekly" => {
            let dow = payload.day_of_week
                .ok_or(AppError::Validation("dayOfWeek is required for weekly rules".into()))?;
            if !(0..=6).contains(&dow) {
                return Err(AppError::Validation("dayOfWeek must be between 0 (Sunday) and 6 (Saturday)".into()));
            }
            (None, dow)
        }
        _ => return Err(AppError::Validation("type must be 'date' or 'weekly'".into())),
    };

    Ok(AvailabilityRule::new(NewRuleParams {
        doctor_id: doctor_id.to_string(),
        kind: payload.kind.clone(),
        day_of_week,
        date,
        start_time: payload.start_time.clone(),
        end_time: payload.end_time.clone(),
        duration_min: payload.duration,
    }))
}

pub async fn add_rule(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    Json(payload): Json<AvailabilityRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_repo.find_by_id(&doctor_id).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;

    let rule = build_rule(&doctor.id, &payload)?;
    let created = state.rule_repo.create(&rule).await?;

    info!("Availability rule {} added for doctor {}", created.id, doctor.id);
    Ok(Json(RuleCreatedResponse { rule_id: created.id }))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_repo.find_by_id(&doctor_id).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;

    let rules = state.rule_repo.list_by_doctor(&doctor.id).await?;
    Ok(Json(rules))
}

pub async fn remove_rule(
    State(state): State<Arc<AppState>>,
    Path((doctor_id, rule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.rule_repo.delete(&doctor_id, &rule_id).await?;
    info!("Availability rule {} removed for doctor {}", rule_id, doctor_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

/// Candidate slots for `[from, to]`, tagged free/booked against the
/// doctor's appointment book. Keyed by date; dates without slots are
/// absent.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_repo.find_by_id(&doctor_id).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;

    let from_str = params.get("from").ok_or(AppError::Validation("from required".into()))?;
    let to_str = params.get("to").ok_or(AppError::Validation("to required".into()))?;

    let from = NaiveDate::parse_from_str(from_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid from date".into()))?;
    let to = NaiveDate::parse_from_str(to_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid to date".into()))?;

    if from > to {
        return Err(AppError::Validation("from must not be after to".into()));
    }

    let rules = state.rule_repo.list_by_doctor(&doctor.id).await?;
    let candidates = availability::expand_rules(&doctor.id, &rules, from, to);

    let range_start = from.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let range_end = (to + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap().and_utc();
    let appointments = state.appointment_repo
        .list_by_range(&doctor.id, range_start, range_end)
        .await?;

    let days: BTreeMap<NaiveDate, Vec<TaggedSlot>> = candidates
        .into_iter()
        .map(|(date, slots)| (date, availability::annotate_slots(&slots, &appointments)))
        .collect();

    Ok(Json(days))
}
