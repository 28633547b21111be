use async_trait::async_trait;
use sensor_core::error::{Result, SensorError};
use sensor_core::models::{GeocodedPlace, Location, SensorId, SensorMetadata};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::PostgresStore;
use crate::ports::SensorRepository;

pub(crate) const INSERT_SENSOR: &str = r#"
    INSERT INTO sensor_metadata (name, location_latitude, location_longitude, tags)
    VALUES ($1, $2, $3, $4)
"#;

pub(crate) const SELECT_SENSOR_BY_NAME: &str = r#"
    SELECT id, name, location_latitude, location_longitude, tags
    FROM sensor_metadata
    WHERE name = $1
    ORDER BY id
    LIMIT 1
"#;

pub(crate) const UPDATE_SENSOR: &str = r#"
    UPDATE sensor_metadata
    SET name = $1, location_latitude = $2, location_longitude = $3, tags = $4
    WHERE id = $5
"#;

// Coordinates arrive as text; the casts let PostgreSQL do the numeric coercion.
pub(crate) const SELECT_NEAREST_SENSOR: &str = r#"
    SELECT id, name, location_latitude, location_longitude, tags,
           earth_distance(
               ll_to_earth($1::float8, $2::float8),
               ll_to_earth(location_latitude, location_longitude)
           ) AS distance
    FROM sensor_metadata
    ORDER BY distance
    LIMIT 1
"#;

fn row_to_sensor(row: &PgRow) -> std::result::Result<SensorMetadata, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let latitude: f64 = row.try_get("location_latitude")?;
    let longitude: f64 = row.try_get("location_longitude")?;
    let tags: Option<Vec<String>> = row.try_get("tags")?;

    Ok(SensorMetadata::new(
        row.try_get::<String, _>("name")?,
        Location::new(latitude, longitude),
        tags.unwrap_or_default(),
    )
    .with_id(SensorId(id)))
}

#[async_trait]
impl SensorRepository for PostgresStore {
    async fn create_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()> {
        sqlx::query(INSERT_SENSOR)
            .bind(&sensor.name)
            .bind(sensor.location.latitude)
            .bind(sensor.location.longitude)
            .bind(&sensor.tags)
            .execute(&self.pool)
            .await
            .map_err(|e| SensorError::Storage(format!("Failed to create sensor metadata: {}", e)))?;

        Ok(())
    }

    async fn get_sensor_metadata_by_name(&self, name: &str) -> Result<SensorMetadata> {
        let row = sqlx::query(SELECT_SENSOR_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SensorError::Storage(format!("Failed to get sensor metadata: {}", e)))?;

        match row {
            Some(row) => row_to_sensor(&row)
                .map_err(|e| SensorError::Storage(format!("Failed to decode sensor row: {}", e))),
            None => Err(SensorError::NotFound),
        }
    }

    async fn update_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()> {
        let result = sqlx::query(UPDATE_SENSOR)
            .bind(&sensor.name)
            .bind(sensor.location.latitude)
            .bind(sensor.location.longitude)
            .bind(&sensor.tags)
            .bind(sensor.id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| SensorError::Storage(format!("Failed to update sensor metadata: {}", e)))?;

        if result.rows_affected() == 0 {
            tracing::debug!(id = sensor.id.0, "Update matched no sensor row");
        }

        Ok(())
    }

    async fn get_nearest_sensor_metadata(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<SensorMetadata> {
        let row = sqlx::query(SELECT_NEAREST_SENSOR)
            .bind(latitude)
            .bind(longitude)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SensorError::Storage(format!("Failed to query nearest sensor: {}", e)))?;

        let row = row.ok_or(SensorError::NotFound)?;

        let distance: f64 = row
            .try_get("distance")
            .map_err(|e| SensorError::Storage(format!("Failed to decode distance: {}", e)))?;

        // 'NaN' and 'Infinity' pass the float8 cast
        if !distance.is_finite() {
            return Err(SensorError::InvalidCoordinate {
                value: format!("{},{}", latitude, longitude),
            });
        }

        row_to_sensor(&row)
            .map(|sensor| sensor.with_distance(distance))
            .map_err(|e| SensorError::Storage(format!("Failed to decode sensor row: {}", e)))
    }

    async fn geocode_city(&self, city: &str) -> Result<GeocodedPlace> {
        let geocoder = self.geocoder.as_ref().ok_or_else(|| SensorError::GeocoderUnavailable {
            reason: "no geocoder configured (set API_KEY)".to_string(),
        })?;
        geocoder.geocode(city).await
    }
}
