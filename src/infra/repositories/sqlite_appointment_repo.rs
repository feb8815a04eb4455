use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create_if_free(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        // Overlap check and insert in one statement; the UNIQUE
        // (doctor_id, start_time) index settles equal-start races.
        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, doctor_id, patient_name, patient_email, start_time, end_time, status, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM appointments WHERE doctor_id = ? AND start_time < ? AND end_time > ?
             )
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.doctor_id)
            .bind(&appointment.patient_name).bind(&appointment.patient_email)
            .bind(appointment.start_time).bind(appointment.end_time)
            .bind(&appointment.status).bind(appointment.created_at)
            .bind(&appointment.doctor_id).bind(appointment.end_time).bind(appointment.start_time)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        created.ok_or(AppError::Conflict("Time slot is already taken".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY start_time ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE doctor_id = ? ORDER BY start_time ASC"
        )
            .bind(doctor_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_range(&self, doctor_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE doctor_id = ? AND start_time < ? AND end_time > ?"
        )
            .bind(doctor_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn confirm(&self, id: &str) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'CONFIRMED' WHERE id = ? RETURNING *"
        )
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Appointment not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Appointment not found".into()));
        }
        Ok(())
    }
}
