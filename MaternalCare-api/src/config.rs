//! Runtime configuration read from the environment

use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use maternal_care_domain::auth::{SecurityError, TokenSettings};
use maternal_care_domain::database::{DatabaseConfig, DatabaseError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("{0} is set but {1} is not")]
    Incomplete(&'static str, &'static str),
}

/// Credentials for the admin account created at startup
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// `None` runs on the in-memory store
    pub database: Option<DatabaseConfig>,
    pub tokens: TokenSettings,
    pub admin: Option<BootstrapAdmin>,
    pub early_warning_url: Option<String>,
    /// Replacement address reference file
    pub address_data_path: Option<PathBuf>,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Read the configuration; call after `dotenv()`
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or(ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        let admin = match (non_empty("ADMIN_EMAIL"), non_empty("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (Some(_), None) => return Err(ConfigError::Incomplete("ADMIN_EMAIL", "ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Incomplete("ADMIN_PASSWORD", "ADMIN_EMAIL")),
            (None, None) => None,
        };

        let config = Self {
            port,
            database: DatabaseConfig::from_env()?,
            tokens: TokenSettings::from_env()?,
            admin,
            early_warning_url: non_empty("EARLY_WARNING_URL"),
            address_data_path: non_empty("ADDRESS_DATA_PATH").map(PathBuf::from),
        };

        info!(
            "Configuration loaded: port={}, database={}, early_warning={}",
            config.port,
            if config.database.is_some() { "postgres" } else { "memory" },
            config.early_warning_url.as_deref().unwrap_or("local rules")
        );
        Ok(config)
    }
}
