mod health;
mod nearest;
mod sensors;

pub use health::health_check;
pub use nearest::{get_nearest_sensor, get_nearest_sensor_by_city};
pub use sensors::{create_sensor, get_sensor, update_sensor};

/// Treat absent and empty query parameters alike
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
