use sensor_store::ports::SensorRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn SensorRepository>,
    /// Backend name reported by the health check ("postgres" or "memory")
    pub storage: &'static str,
}

impl AppState {
    pub fn new(repository: Arc<dyn SensorRepository>, storage: &'static str) -> Self {
        Self { repository, storage }
    }
}
