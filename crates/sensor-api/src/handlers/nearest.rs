use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use sensor_core::error::SensorError;
use sensor_core::models::SensorMetadata;

use super::non_empty;
use crate::dto::{CityQuery, NearestQuery};
use crate::error::ApiError;
use crate::state::AppState;

const NO_NEAREST: &str = "No nearest sensor found";

/// GET /sensors/nearest?latitude=&longitude=
pub async fn get_nearest_sensor(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<SensorMetadata>, ApiError> {
    let (latitude, longitude) = query
        .ok()
        .and_then(|Query(q)| Some((non_empty(q.latitude)?, non_empty(q.longitude)?)))
        .ok_or_else(|| ApiError::bad_request("Missing 'latitude' or 'longitude' parameter"))?;

    tracing::info!(latitude = %latitude, longitude = %longitude, "Finding nearest sensor");

    let sensor = state
        .repository
        .get_nearest_sensor_metadata(&latitude, &longitude)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Nearest sensor query failed");
            ApiError::not_found(NO_NEAREST)
        })?;

    Ok(Json(sensor))
}

/// GET /sensors/nearest/city?city=
pub async fn get_nearest_sensor_by_city(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> Result<Json<SensorMetadata>, ApiError> {
    let city = query
        .ok()
        .and_then(|Query(q)| non_empty(q.city))
        .ok_or_else(|| ApiError::bad_request("Missing 'city' parameter"))?;

    tracing::info!(city = %city, "Finding nearest sensor to city");

    let sensor =
        state.repository.get_nearest_sensor_by_city_metadata(&city).await.map_err(|e| {
            tracing::error!(error = %e, city = %city, "Nearest sensor by city failed");
            match e {
                SensorError::Geocoding { .. } | SensorError::GeocoderUnavailable { .. } => {
                    ApiError::bad_gateway("Geocoding lookup failed")
                }
                _ => ApiError::not_found(NO_NEAREST),
            }
        })?;

    Ok(Json(sensor))
}
