pub mod geocode;
pub mod location;
pub mod sensor;

pub use geocode::{GeocodeFeature, GeocodeGeometry, GeocodeResponse, GeocodedPlace};
pub use location::Location;
pub use sensor::{SensorId, SensorMetadata};
