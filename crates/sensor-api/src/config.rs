use std::env;

use sensor_store::geocoding::MAPBOX_BASE_URL;
use sensor_store::postgres::{ConfigError, PostgresConfig};

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// `None` when `DB_HOST` is unset; the server then runs on in-memory storage
    pub database: Option<PostgresConfig>,
    pub geocoder: GeocoderConfig,
}

/// Geocoding provider configuration
#[derive(Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: MAPBOX_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database = PostgresConfig::from_env()?;

        let geocoder = GeocoderConfig {
            base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| MAPBOX_BASE_URL.to_string()),
            api_key: env::var("API_KEY").ok().filter(|k| !k.trim().is_empty()),
        };

        Ok(Self {
            port,
            cors_origin,
            database,
            geocoder,
        })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database.is_some()
    }
}
