use std::env;

use services::services::phases::PhaseMode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration, read once at startup. Invalid values are startup
/// errors, never silent fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub phase_mode: PhaseMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("SITELOG_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = match env::var("SITELOG_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "SITELOG_PORT",
                value,
            })?,
            Err(_) => 8080,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:sitelog.db".to_string());

        let phase_mode = match env::var("SITELOG_PHASE_MODE") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "SITELOG_PHASE_MODE",
                value,
            })?,
            Err(_) => PhaseMode::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            phase_mode,
        })
    }
}
