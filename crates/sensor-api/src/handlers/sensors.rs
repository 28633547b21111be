use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use sensor_core::models::SensorMetadata;
use serde::de::DeserializeOwned;

use super::non_empty;
use crate::dto::{CreateSensorRequest, NameQuery, UpdateSensorRequest};
use crate::error::ApiError;
use crate::state::AppState;

const INVALID_PAYLOAD: &str = "Invalid request payload";

/// Decode a JSON body whatever its Content-Type header says
fn decode<T: DeserializeOwned>(payload: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    let body = payload.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read request body");
        ApiError::bad_request(INVALID_PAYLOAD)
    })?;

    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request payload");
        ApiError::bad_request(INVALID_PAYLOAD)
    })
}

/// POST /sensors
pub async fn create_sensor(
    State(state): State<Arc<AppState>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let sensor = decode::<CreateSensorRequest>(payload)?.into_sensor()?;

    tracing::info!(name = %sensor.name, tags = sensor.tags.len(), "Creating sensor metadata");

    state.repository.create_sensor_metadata(&sensor).await.map_err(|e| {
        tracing::error!(error = %e, name = %sensor.name, "Failed to create sensor metadata");
        ApiError::internal("Failed to create sensor metadata")
    })?;

    Ok(StatusCode::CREATED)
}

/// GET /sensors?name=
pub async fn get_sensor(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<Json<SensorMetadata>, ApiError> {
    let name = query
        .ok()
        .and_then(|Query(q)| non_empty(q.name))
        .ok_or_else(|| ApiError::bad_request("Missing 'name' parameter"))?;

    tracing::info!(name = %name, "Getting sensor metadata");

    let sensor = state.repository.get_sensor_metadata_by_name(&name).await.map_err(|e| {
        if e.is_not_found() {
            tracing::info!(name = %name, "Sensor metadata not found");
        } else {
            tracing::error!(error = %e, name = %name, "Failed to get sensor metadata");
        }
        ApiError::not_found("Sensor metadata not found")
    })?;

    Ok(Json(sensor))
}

/// PUT /sensors (the record is identified by `id` in the body)
pub async fn update_sensor(
    State(state): State<Arc<AppState>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let sensor = decode::<UpdateSensorRequest>(payload)?.into_sensor()?;

    tracing::info!(id = sensor.id.0, name = %sensor.name, "Updating sensor metadata");

    state.repository.update_sensor_metadata(&sensor).await.map_err(|e| {
        tracing::error!(error = %e, id = sensor.id.0, "Failed to update sensor metadata");
        ApiError::internal("Failed to update sensor metadata")
    })?;

    Ok(StatusCode::OK)
}
