//! PostgreSQL storage adapter implementation

pub mod config;
pub mod sensor;

pub use config::{ConfigError, PoolConfig, PostgresConfig};

use std::sync::Arc;

use sensor_core::error::{Result, SensorError};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::ports::Geocoder;

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given configuration
    pub async fn new(config: &PostgresConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            username = %config.username,
            max_connections = config.pool.max_connections,
            "Connecting to PostgreSQL"
        );

        // Create connection pool
        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| SensorError::Storage(format!("Failed to connect to database: {}", e)))?;

        let store = Self::from_pool(pool);
        store.health_check().await?;
        Ok(store)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool, geocoder: None }
    }

    /// Attach a geocoder for city lookups
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| SensorError::Storage(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}
