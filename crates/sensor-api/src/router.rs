use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Sensor metadata
        .route("/sensors", post(handlers::create_sensor))
        .route("/sensors", get(handlers::get_sensor))
        .route("/sensors", put(handlers::update_sensor))

        // Nearest-sensor queries
        .route("/sensors/nearest", get(handlers::get_nearest_sensor))
        .route("/sensors/nearest/city", get(handlers::get_nearest_sensor_by_city))

        .with_state(state)
}
