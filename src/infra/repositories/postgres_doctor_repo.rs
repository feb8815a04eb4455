use crate::domain::{models::doctor::Doctor, ports::DoctorRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresDoctorRepo {
    pool: PgPool,
}

impl PostgresDoctorRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for PostgresDoctorRepo {
    async fn create(&self, doctor: &Doctor) -> Result<Doctor, AppError> {
        sqlx::query_as::<_, Doctor>(
            "INSERT INTO doctors (id, name, email, phone, specialization, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&doctor.id).bind(&doctor.name).bind(&doctor.email)
            .bind(&doctor.phone).bind(&doctor.specialization).bind(doctor.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Doctor>, AppError> {
        sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Doctor>, AppError> {
        sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Doctor not found".into()));
        }
        Ok(())
    }
}
