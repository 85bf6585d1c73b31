//! Database connection module for the MaternalCare application
//!
//! Postgres is the only durable backend. When no connection string is
//! configured the repositories run against the in-memory store instead.

use std::env;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tracing::info;

pub mod migrations;

pub use migrations::run_migrations;

/// Database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Connection error
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// Query error
    #[error("Database query error: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::QueryError(error.to_string())
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string
    pub connection_string: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Build a configuration around a connection string with default pool settings
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }

    /// Create a new database configuration from environment variables
    ///
    /// Returns `Ok(None)` when `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Option<Self>, DatabaseError> {
        let connection_string = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                info!("DATABASE_URL not set, records will be kept in memory");
                return Ok(None);
            }
        };

        if !connection_string.starts_with("postgres://") && !connection_string.starts_with("postgresql://") {
            return Err(DatabaseError::ConfigError(
                "DATABASE_URL must be a postgres:// connection string".to_string(),
            ));
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!("Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds);

        Ok(Some(DatabaseConfig {
            connection_string,
            max_connections,
            timeout_seconds,
        }))
    }
}

/// Connect to Postgres and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    info!("Connecting to PostgreSQL (max_connections={})", config.max_connections);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.timeout_seconds))
        .connect(&config.connection_string)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool).await?;

    info!("PostgreSQL connection pool ready");
    Ok(pool)
}

/// Describe the pool for health reporting
pub fn get_connection_info(pool: &PgPool) -> String {
    format!(
        "PostgreSQL (connections: size={}, idle={})",
        pool.size(),
        pool.num_idle()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_new_uses_defaults() {
        let config = DatabaseConfig::new("postgres://localhost/maternal_care");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.connection_string, "postgres://localhost/maternal_care");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_connect_runs_migrations() {
        let url = env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = connect(&DatabaseConfig::new(url)).await.expect("pool creation failed");
        let one: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one.0, 1);
    }
}
