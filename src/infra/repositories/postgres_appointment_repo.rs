use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create_if_free(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        // Overlap check and insert in one statement; the UNIQUE
        // (doctor_id, start_time) index settles equal-start races.
        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, doctor_id, patient_name, patient_email, start_time, end_time, status, created_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8
             WHERE NOT EXISTS (
                 SELECT 1 FROM appointments WHERE doctor_id = $2 AND start_time < $6 AND end_time > $5
             )
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.doctor_id)
            .bind(&appointment.patient_name).bind(&appointment.patient_email)
            .bind(appointment.start_time).bind(appointment.end_time)
            .bind(&appointment.status).bind(appointment.created_at)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        created.ok_or(AppError::Conflict("Time slot is already taken".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY start_time ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE doctor_id = $1 ORDER BY start_time ASC"
        )
            .bind(doctor_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_range(&self, doctor_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE doctor_id = $1 AND start_time < $2 AND end_time > $3"
        )
            .bind(doctor_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn confirm(&self, id: &str) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'CONFIRMED' WHERE id = $1 RETURNING *"
        )
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Appointment not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Appointment not found".into()));
        }
        Ok(())
    }
}
