use crate::domain::models::{
    appointment::Appointment, availability_rule::AvailabilityRule, doctor::Doctor,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn create(&self, doctor: &Doctor) -> Result<Doctor, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Doctor>, AppError>;
    async fn list(&self) -> Result<Vec<Doctor>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AvailabilityRuleRepository: Send + Sync {
    async fn create(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError>;
    async fn list_by_doctor(&self, doctor_id: &str) -> Result<Vec<AvailabilityRule>, AppError>;
    async fn delete(&self, doctor_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Commits the appointment only if its `[start, end)` interval
    /// overlaps no existing appointment of the same doctor. Check and
    /// insert are one atomic statement; a losing concurrent commit
    /// observes `Conflict`.
    async fn create_if_free(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list(&self) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_range(&self, doctor_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn confirm(&self, id: &str) -> Result<Appointment, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
