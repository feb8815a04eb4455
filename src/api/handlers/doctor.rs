use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateDoctorRequest;
use crate::api::handlers::availability::build_rule;
use crate::domain::models::doctor::Doctor;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.specialization.trim().is_empty() {
        return Err(AppError::Validation("specialization is required".into()));
    }

    let doctor = Doctor::new(payload.name, payload.email, payload.phone, payload.specialization);

    // Validate the initial rule set up front so a bad rule leaves no
    // half-created doctor behind.
    let rules = payload.availability
        .iter()
        .map(|r| build_rule(&doctor.id, r))
        .collect::<Result<Vec<_>, _>>()?;

    let created = state.doctor_repo.create(&doctor).await?;
    for rule in &rules {
        state.rule_repo.create(rule).await?;
    }

    info!("Doctor created: {} ({} rules)", created.id, rules.len());
    Ok(Json(created))
}

pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let doctors = state.doctor_repo.list().await?;
    Ok(Json(doctors))
}

pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_repo.find_by_id(&doctor_id).await?
        .ok_or(AppError::NotFound("Doctor not found".into()))?;
    Ok(Json(doctor))
}

pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.doctor_repo.delete(&doctor_id).await?;
    info!("Doctor deleted: {}", doctor_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
