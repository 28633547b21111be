//! In-memory storage implementation for development and testing.
//!
//! This implementation uses `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the PostgreSQL backend.

use async_trait::async_trait;
use sensor_core::error::{Result, SensorError};
use sensor_core::models::{GeocodedPlace, Location, SensorId, SensorMetadata};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::ports::{Geocoder, SensorRepository};

/// In-memory implementation of SensorRepository
#[derive(Clone, Default)]
pub struct MemorySensorStore {
    sensors: Arc<RwLock<BTreeMap<SensorId, SensorMetadata>>>,
    next_id: Arc<RwLock<i64>>,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl MemorySensorStore {
    /// Create a new in-memory store without geocoding support
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a geocoder for city lookups
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Number of stored sensors
    pub fn len(&self) -> usize {
        self.sensors.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_coordinate(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SensorError::InvalidCoordinate { value: value.to_string() })
}

#[async_trait]
impl SensorRepository for MemorySensorStore {
    async fn create_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()> {
        let mut sensors = self.sensors.write().unwrap();
        let mut next_id = self.next_id.write().unwrap();

        *next_id += 1;
        let id = SensorId(*next_id);

        let mut stored = sensor.clone().with_id(id);
        stored.distance = None;

        sensors.insert(id, stored);
        Ok(())
    }

    async fn get_sensor_metadata_by_name(&self, name: &str) -> Result<SensorMetadata> {
        let sensors = self.sensors.read().unwrap();
        sensors.values().find(|s| s.name == name).cloned().ok_or(SensorError::NotFound)
    }

    async fn update_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()> {
        let mut sensors = self.sensors.write().unwrap();
        if let Some(stored) = sensors.get_mut(&sensor.id) {
            stored.name = sensor.name.clone();
            stored.location = sensor.location;
            stored.tags = sensor.tags.clone();
        }
        Ok(())
    }

    async fn get_nearest_sensor_metadata(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<SensorMetadata> {
        let origin = Location::new(parse_coordinate(latitude)?, parse_coordinate(longitude)?);

        let sensors = self.sensors.read().unwrap();
        sensors
            .values()
            .map(|s| (s, origin.distance_to(&s.location)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(s, distance)| s.clone().with_distance(distance))
            .ok_or(SensorError::NotFound)
    }

    async fn geocode_city(&self, city: &str) -> Result<GeocodedPlace> {
        let geocoder = self.geocoder.as_ref().ok_or_else(|| SensorError::GeocoderUnavailable {
            reason: "no geocoder configured".to_string(),
        })?;
        geocoder.geocode(city).await
    }
}
