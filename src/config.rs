use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Runtime settings, read from the process environment (and `.env`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cors_origin: String,
    // Payment gateway settings. Only payment creation needs them.
    pub school_id: Option<String>,
    pub pg_key: Option<String>,
    pub api_key: Option<String>,
    pub payment_api_url: Option<String>,
    pub callback_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::build(config::Environment::default())
    }

    /// Builds the configuration from an explicit variable map instead of
    /// the process environment.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::build(config::Environment::default().source(Some(vars)))
    }

    fn build(source: config::Environment) -> Result<Self, ConfigError> {
        let config: AppConfig = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("database_max_connections", 10_i64)?
            .set_default("database_acquire_timeout_secs", 5_i64)?
            .set_default("jwt_expiration_hours", 24_i64)?
            .set_default("cors_origin", "http://localhost:5173")?
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }
        if config.database_url.trim().is_empty() {
            return Err(ConfigError::Empty("DATABASE_URL"));
        }

        Ok(config)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.database_acquire_timeout_secs)
    }
}
