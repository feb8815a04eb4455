use std::sync::Arc;
use crate::domain::ports::{AppointmentRepository, AvailabilityRuleRepository, DoctorRepository};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub doctor_repo: Arc<dyn DoctorRepository>,
    pub rule_repo: Arc<dyn AvailabilityRuleRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
}
