//! Error types for the sensor metadata service

use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum SensorError {
    // Lookup errors
    #[error("Sensor metadata not found")]
    NotFound,

    #[error("No geocoding result for city '{city}'")]
    NoGeocodeResult { city: String },

    // Input errors
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid coordinate value '{value}'")]
    InvalidCoordinate { value: String },

    // Backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Geocoding failed: {reason}")]
    Geocoding { reason: String },

    #[error("Geocoder unavailable: {reason}")]
    GeocoderUnavailable { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

impl SensorError {
    /// True for the "nothing matched" outcomes (zero rows, zero geocoding candidates)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound | Self::NoGeocodeResult { .. })
    }
}

pub type Result<T> = std::result::Result<T, SensorError>;
