pub mod appointment;
pub mod availability_rule;
pub mod doctor;
pub mod intent;
pub mod interval;
pub mod slot;
