use crate::domain::{models::availability_rule::AvailabilityRule, ports::AvailabilityRuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRuleRepo {
    pool: SqlitePool,
}

impl SqliteRuleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRuleRepository for SqliteRuleRepo {
    async fn create(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "INSERT INTO availability_rules (id, doctor_id, kind, day_of_week, date, start_time, end_time, duration_min, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.doctor_id).bind(&rule.kind).bind(rule.day_of_week)
            .bind(rule.date).bind(&rule.start_time).bind(&rule.end_time)
            .bind(rule.duration_min).bind(rule.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_doctor(&self, doctor_id: &str) -> Result<Vec<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules WHERE doctor_id = ? ORDER BY day_of_week ASC, start_time ASC"
        )
            .bind(doctor_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, doctor_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM availability_rules WHERE doctor_id = ? AND id = ?")
            .bind(doctor_id).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Availability rule not found".into()));
        }
        Ok(())
    }
}
