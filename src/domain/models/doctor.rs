use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn new(name: String, email: String, phone: Option<String>, specialization: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            specialization,
            created_at: Utc::now(),
        }
    }
}
