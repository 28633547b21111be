//! PostgreSQL configuration

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl From<ConfigError> for sensor_core::SensorError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing(key) => Self::ConfigMissing { key },
            ConfigError::Invalid { key, reason } => Self::ConfigInvalid { key, reason },
        }
    }
}

/// PostgreSQL connection configuration
#[derive(Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: Option<String>,
    /// Connection pool configuration
    pub pool: PoolConfig,
}

/// Hides the password
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pool", &self.pool)
            .finish()
    }
}

impl PostgresConfig {
    pub const DEFAULT_PORT: u16 = 5432;

    /// Load configuration from environment variables
    ///
    /// Returns `Ok(None)` when `DB_HOST` is unset, meaning no database is
    /// configured. Otherwise `DB_NAME` and `DB_USER` are required; `DB_PORT`
    /// defaults to 5432 and `DB_PASSWORD` is optional.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = match std::env::var("DB_HOST") {
            Ok(host) => host,
            Err(_) => return Ok(None),
        };

        let port = match std::env::var("DB_PORT") {
            Ok(port) => port.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "DB_PORT".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => Self::DEFAULT_PORT,
        };

        let database =
            std::env::var("DB_NAME").map_err(|_| ConfigError::Missing("DB_NAME".to_string()))?;
        let username =
            std::env::var("DB_USER").map_err(|_| ConfigError::Missing("DB_USER".to_string()))?;
        let password = std::env::var("DB_PASSWORD").ok();

        let mut pool = PoolConfig::default();
        if let Ok(max) = std::env::var("DB_MAX_CONNECTIONS") {
            pool.max_connections = max.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS".to_string(),
                reason: format!("'{}' is not a positive integer", max),
            })?;
        }

        let config = Self { host, port, database, username, password, pool };
        config.validate()?;
        Ok(Some(config))
    }

    /// Create a new configuration with default pool settings
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            password,
            pool: PoolConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("DB_HOST", &self.host),
            ("DB_NAME", &self.database),
            ("DB_USER", &self.username),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    reason: "cannot be empty".to_string(),
                });
            }
        }

        self.pool.validate()?;

        Ok(())
    }

    /// sqlx connection options (`sslmode=disable`)
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .ssl_mode(PgSslMode::Disable);

        if let Some(password) = &self.password {
            options = options.password(password);
        }

        options
    }
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum number of connections allowed
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Timeout for idle connections before they are closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "pool.min_connections".to_string(),
                reason: format!(
                    "min_connections ({}) cannot be greater than max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}
