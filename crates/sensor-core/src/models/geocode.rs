use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::Location;
use crate::error::{Result, SensorError};

/// Forward geocoding response body (Mapbox Geocoding v5 shape)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

/// One candidate place in a geocoding response
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeFeature {
    pub geometry: GeocodeGeometry,
    #[serde(default)]
    pub place_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeGeometry {
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

impl GeocodeResponse {
    /// Resolve the first candidate into a place.
    ///
    /// An empty candidate list is reported as [`SensorError::NoGeocodeResult`].
    pub fn first_place(&self, city: &str) -> Result<GeocodedPlace> {
        let feature = self
            .features
            .first()
            .ok_or_else(|| SensorError::NoGeocodeResult { city: city.to_string() })?;

        feature.to_place()
    }
}

impl GeocodeFeature {
    pub fn to_place(&self) -> Result<GeocodedPlace> {
        match self.geometry.coordinates.as_slice() {
            [longitude, latitude, ..] => Ok(GeocodedPlace {
                location: Location::new(*latitude, *longitude),
                place_name: self.place_name.clone(),
            }),
            other => Err(SensorError::Geocoding {
                reason: format!(
                    "candidate '{}' has {} coordinate(s), expected [longitude, latitude]",
                    self.place_name,
                    other.len()
                ),
            }),
        }
    }
}

/// The geocoded position chosen for a city query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub location: Location,
    pub place_name: String,
}

/// Formats as `latitude,longitude` with six decimals
impl fmt::Display for GeocodedPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.location.latitude, self.location.longitude)
    }
}
