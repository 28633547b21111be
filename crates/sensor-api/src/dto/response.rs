use serde::Serialize;

/// Error envelope shared by every failure response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub storage: &'static str,
}

impl HealthResponse {
    pub fn ok(storage: &'static str) -> Self {
        Self { status: "ok", service: "sensor-api", storage }
    }
}
