pub mod sqlite_doctor_repo;
pub mod sqlite_rule_repo;
pub mod sqlite_appointment_repo;

pub mod postgres_doctor_repo;
pub mod postgres_rule_repo;
pub mod postgres_appointment_repo;
