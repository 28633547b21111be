use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// GPS position of a sensor, in decimal degrees.
///
/// No range checks are applied; values outside [-90, 90] / [-180, 180] are
/// stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in metres
    pub fn distance_to(&self, other: &Location) -> f64 {
        Haversine.distance(self.to_point(), other.to_point())
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}
