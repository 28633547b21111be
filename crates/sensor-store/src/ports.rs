use async_trait::async_trait;
use sensor_core::error::Result;
use sensor_core::models::{GeocodedPlace, SensorMetadata};

/// Port for sensor metadata persistence and nearest-sensor queries
#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Insert a new sensor record; the payload's id is ignored
    async fn create_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()>;

    /// Exact-match lookup by name
    /// Returns `SensorError::NotFound` when no record has that name
    async fn get_sensor_metadata_by_name(&self, name: &str) -> Result<SensorMetadata>;

    /// Replace name, location and tags of the record with `sensor.id`
    /// Succeeds even when no record has that id
    async fn update_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()>;

    /// Closest sensor to the given point, with `distance` set in metres
    /// Coordinates are forwarded as given; the backend does the numeric coercion
    async fn get_nearest_sensor_metadata(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<SensorMetadata>;

    /// Geocode `city` and return the closest sensor to its first candidate
    async fn get_nearest_sensor_by_city_metadata(&self, city: &str) -> Result<SensorMetadata> {
        let place = self.geocode_city(city).await?;
        tracing::debug!(city = %city, place = %place.place_name, at = %place, "Geocoded city");

        self.get_nearest_sensor_metadata(
            &place.location.latitude.to_string(),
            &place.location.longitude.to_string(),
        )
        .await
    }

    /// First geocoding candidate for `city`
    async fn geocode_city(&self, city: &str) -> Result<GeocodedPlace>;
}

/// Port for forward geocoding of place names
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `query` to its first candidate place
    /// Returns `SensorError::NoGeocodeResult` when the provider has no candidates
    async fn geocode(&self, query: &str) -> Result<GeocodedPlace>;
}
