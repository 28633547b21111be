mod request;
mod response;

pub use request::{
    CityQuery, CreateSensorRequest, LocationRequest, NameQuery, NearestQuery, UpdateSensorRequest,
};
pub use response::{ErrorResponse, HealthResponse};
