use sensor_core::models::{Location, SensorId, SensorMetadata};
use sensor_core::validation::{
    validate_fields, FieldRule, FieldValue, Rule, Validate, ValidationErrors,
};
use serde::Deserialize;

/// Location as received; both coordinates must be present
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LocationRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// POST /sensors body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSensorRequest {
    pub name: Option<String>,
    pub location: Option<LocationRequest>,
    pub tags: Option<Vec<String>>,
}

/// PUT /sensors body; the record to replace is identified by `id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSensorRequest {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub sensor: CreateSensorRequest,
}

fn name(r: &CreateSensorRequest) -> FieldValue<'_> {
    r.name.as_deref().into()
}

fn location(r: &CreateSensorRequest) -> FieldValue<'_> {
    match r.location {
        Some(_) => FieldValue::Present,
        None => FieldValue::Missing,
    }
}

fn latitude(r: &CreateSensorRequest) -> FieldValue<'_> {
    r.location.and_then(|l| l.latitude).into()
}

fn longitude(r: &CreateSensorRequest) -> FieldValue<'_> {
    r.location.and_then(|l| l.longitude).into()
}

const SENSOR_RULES: &[FieldRule<CreateSensorRequest>] = &[
    FieldRule { field: "name", rule: Rule::Required, value: name },
    FieldRule { field: "location", rule: Rule::Required, value: location },
    FieldRule { field: "location.latitude", rule: Rule::Required, value: latitude },
    FieldRule { field: "location.latitude", rule: Rule::Finite, value: latitude },
    FieldRule { field: "location.longitude", rule: Rule::Required, value: longitude },
    FieldRule { field: "location.longitude", rule: Rule::Finite, value: longitude },
];

fn id(r: &UpdateSensorRequest) -> FieldValue<'_> {
    r.id.into()
}

fn update_name(r: &UpdateSensorRequest) -> FieldValue<'_> {
    name(&r.sensor)
}

fn update_location(r: &UpdateSensorRequest) -> FieldValue<'_> {
    location(&r.sensor)
}

fn update_latitude(r: &UpdateSensorRequest) -> FieldValue<'_> {
    latitude(&r.sensor)
}

fn update_longitude(r: &UpdateSensorRequest) -> FieldValue<'_> {
    longitude(&r.sensor)
}

const UPDATE_RULES: &[FieldRule<UpdateSensorRequest>] = &[
    FieldRule { field: "id", rule: Rule::Required, value: id },
    FieldRule { field: "id", rule: Rule::Positive, value: id },
    FieldRule { field: "name", rule: Rule::Required, value: update_name },
    FieldRule { field: "location", rule: Rule::Required, value: update_location },
    FieldRule { field: "location.latitude", rule: Rule::Required, value: update_latitude },
    FieldRule { field: "location.latitude", rule: Rule::Finite, value: update_latitude },
    FieldRule { field: "location.longitude", rule: Rule::Required, value: update_longitude },
    FieldRule { field: "location.longitude", rule: Rule::Finite, value: update_longitude },
];

impl Validate for CreateSensorRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(self, SENSOR_RULES)
    }
}

impl Validate for UpdateSensorRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(self, UPDATE_RULES)
    }
}

impl CreateSensorRequest {
    /// Validate and convert into an unsaved sensor record
    pub fn into_sensor(self) -> Result<SensorMetadata, ValidationErrors> {
        self.validate()?;

        // Fields are guaranteed present by the rules above
        let location = self.location.unwrap_or_default();
        let location = Location::new(
            location.latitude.unwrap_or_default(),
            location.longitude.unwrap_or_default(),
        );

        Ok(SensorMetadata::new(
            self.name.unwrap_or_default(),
            location,
            self.tags.unwrap_or_default(),
        ))
    }
}

impl UpdateSensorRequest {
    /// Validate and convert into the replacement record for `id`
    pub fn into_sensor(self) -> Result<SensorMetadata, ValidationErrors> {
        self.validate()?;

        let id = SensorId(self.id.unwrap_or_default());
        Ok(self.sensor.into_sensor()?.with_id(id))
    }
}

/// GET /sensors query
#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// GET /sensors/nearest query; values stay strings until the store sees them
#[derive(Debug, Default, Deserialize)]
pub struct NearestQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// GET /sensors/nearest/city query
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}
