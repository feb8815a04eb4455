use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub default_slot_duration_min: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            default_slot_duration_min: env::var("DEFAULT_SLOT_DURATION_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("DEFAULT_SLOT_DURATION_MIN must be a number"),
        }
    }
}
