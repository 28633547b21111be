//! Mapbox forward geocoding adapter

use async_trait::async_trait;
use sensor_core::error::{Result, SensorError};
use sensor_core::models::{GeocodeResponse, GeocodedPlace};

use crate::ports::Geocoder;

/// Public Mapbox API host
pub const MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

/// Geocoder backed by the Mapbox Geocoding v5 `mapbox.places` endpoint
pub struct MapboxGeocoder {
    /// Base URL for the API (e.g., "https://api.mapbox.com")
    base_url: String,

    /// Access token sent as the `access_token` query parameter
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl MapboxGeocoder {
    /// Create a geocoder against a custom base URL
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with the public Mapbox host
    pub fn mapbox(api_key: impl Into<String>) -> Self {
        Self::new(MAPBOX_BASE_URL, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/geocoding/v5/mapbox.places/{query}.json?access_token={key}`.
    /// The query is percent-encoded as a single path segment.
    fn request_url(&self, query: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| SensorError::ConfigInvalid {
            key: "GEOCODER_BASE_URL".to_string(),
            reason: e.to_string(),
        })?;

        let file = format!("{}.json", query);
        {
            let mut segments = url.path_segments_mut().map_err(|_| SensorError::ConfigInvalid {
                key: "GEOCODER_BASE_URL".to_string(),
                reason: format!("'{}' cannot be used as a base URL", self.base_url),
            })?;
            segments.pop_if_empty().extend(["geocoding", "v5", "mapbox.places", file.as_str()]);
        }

        url.query_pairs_mut().append_pair("access_token", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeocodedPlace> {
        let url = self.request_url(query)?;
        tracing::debug!(query = %query, base_url = %self.base_url, "Sending geocoding request");

        // without_url() keeps the access token out of error messages
        let response =
            self.client.get(url).send().await.map_err(|e| SensorError::Geocoding {
                reason: format!("Failed to reach geocoding provider: {}", e.without_url()),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SensorError::Geocoding {
                reason: format!("Geocoding API error ({}): {}", status, error_text),
            });
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| SensorError::Geocoding {
            reason: format!("Failed to parse geocoding response: {}", e.without_url()),
        })?;

        tracing::debug!(query = %query, candidates = body.features.len(), "Geocoding response");
        body.first_place(query)
    }
}
