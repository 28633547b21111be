use serde::{Deserialize, Serialize};

use super::location::Location;

/// Database-assigned identifier of a sensor record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub i64);

/// Metadata describing one physical sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMetadata {
    /// Assigned by the store; zero until persisted
    #[serde(default)]
    pub id: SensorId,

    /// Natural key used for lookups
    pub name: String,

    pub location: Location,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Metres from the query point; only set on nearest-sensor results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl SensorMetadata {
    /// Create an unsaved sensor record
    pub fn new(name: impl Into<String>, location: Location, tags: Vec<String>) -> Self {
        Self {
            id: SensorId::default(),
            name: name.into(),
            location,
            tags,
            distance: None,
        }
    }

    pub fn with_id(mut self, id: SensorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}
