//! HTTP-level tests for the sensor routes, backed by the in-memory store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use sensor_api::{create_router, AppState};
use sensor_core::error::{Result, SensorError};
use sensor_core::models::{GeocodedPlace, Location, SensorMetadata};
use sensor_store::memory::MemorySensorStore;
use sensor_store::ports::{Geocoder, SensorRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

const SENSOR1: &str =
    r#"{"name":"Sensor1","location":{"latitude":123.456,"longitude":789.012},"tags":["tag1","tag2"]}"#;

/// Geocoder with a fixed answer per city
struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeocodedPlace> {
        let location = match query {
            "Berlin" => Location::new(52.517, 13.3889),
            "Paris" => Location::new(48.8566, 2.3522),
            "Offline" => {
                return Err(SensorError::Geocoding { reason: "connection refused".to_string() })
            }
            _ => return Err(SensorError::NoGeocodeResult { city: query.to_string() }),
        };
        Ok(GeocodedPlace { location, place_name: query.to_string() })
    }
}

/// Wraps the memory store and counts writes
#[derive(Clone)]
struct CountingRepository {
    inner: MemorySensorStore,
    creates: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
}

#[async_trait]
impl SensorRepository for CountingRepository {
    async fn create_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_sensor_metadata(sensor).await
    }

    async fn get_sensor_metadata_by_name(&self, name: &str) -> Result<SensorMetadata> {
        self.inner.get_sensor_metadata_by_name(name).await
    }

    async fn update_sensor_metadata(&self, sensor: &SensorMetadata) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_sensor_metadata(sensor).await
    }

    async fn get_nearest_sensor_metadata(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<SensorMetadata> {
        self.inner.get_nearest_sensor_metadata(latitude, longitude).await
    }

    async fn geocode_city(&self, city: &str) -> Result<GeocodedPlace> {
        self.inner.geocode_city(city).await
    }
}

/// Repository whose every call fails with a storage error
struct BrokenRepository;

#[async_trait]
impl SensorRepository for BrokenRepository {
    async fn create_sensor_metadata(&self, _: &SensorMetadata) -> Result<()> {
        Err(SensorError::Storage("connection reset by peer".to_string()))
    }

    async fn get_sensor_metadata_by_name(&self, _: &str) -> Result<SensorMetadata> {
        Err(SensorError::Storage("connection reset by peer".to_string()))
    }

    async fn update_sensor_metadata(&self, _: &SensorMetadata) -> Result<()> {
        Err(SensorError::Storage("connection reset by peer".to_string()))
    }

    async fn get_nearest_sensor_metadata(&self, _: &str, _: &str) -> Result<SensorMetadata> {
        Err(SensorError::Storage("connection reset by peer".to_string()))
    }

    async fn geocode_city(&self, _: &str) -> Result<GeocodedPlace> {
        Err(SensorError::Storage("connection reset by peer".to_string()))
    }
}

struct TestApp {
    router: Router,
    repository: CountingRepository,
}

impl TestApp {
    fn new() -> Self {
        Self::with_store(MemorySensorStore::new().with_geocoder(Arc::new(StubGeocoder)))
    }

    /// No API key configured: city lookups have no geocoder
    fn without_geocoder() -> Self {
        Self::with_store(MemorySensorStore::new())
    }

    fn with_store(inner: MemorySensorStore) -> Self {
        let repository = CountingRepository {
            inner,
            creates: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(AtomicUsize::new(0)),
        };
        let state = Arc::new(AppState::new(Arc::new(repository.clone()), "memory"));
        Self { router: create_router(state), repository }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        send(&self.router, method, uri, body).await
    }

    async fn create(&self, body: &str) {
        let (status, _) = self.send(Method::POST, "/sensors", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    fn creates(&self) -> usize {
        self.repository.creates.load(Ordering::SeqCst)
    }

    fn updates(&self) -> usize {
        self.repository.updates.load(Ordering::SeqCst)
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, String) {
    send_with_content_type(router, method, uri, body, Some("application/json")).await
}

async fn send_with_content_type(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    content_type: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            if let Some(content_type) = content_type {
                builder = builder.header(header::CONTENT_TYPE, content_type);
            }
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_create_then_get_by_name() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::POST, "/sensors", Some(SENSOR1)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "");

    let (status, body) = app.send(Method::GET, "/sensors?name=Sensor1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"id":1,"name":"Sensor1","location":{"latitude":123.456,"longitude":789.012},"tags":["tag1","tag2"]}"#
    );
}

#[tokio::test]
async fn test_get_without_name() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/sensors", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Missing 'name' parameter"}"#);

    let (status, _) = app.send(Method::GET, "/sensors?name=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_name() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/sensors?name=ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"message": "Sensor metadata not found"}));
}

#[tokio::test]
async fn test_create_ignores_content_type() {
    let app = TestApp::new();

    let (status, body) =
        send_with_content_type(&app.router, Method::POST, "/sensors", Some(SENSOR1), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "");

    let (status, _) = send_with_content_type(
        &app.router,
        Method::POST,
        "/sensors",
        Some(r#"{"name":"Sensor2","location":{"latitude":1,"longitude":2}}"#),
        Some("application/x-www-form-urlencoded"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send(Method::GET, "/sensors?name=Sensor1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"id":1,"name":"Sensor1","location":{"latitude":123.456,"longitude":789.012},"tags":["tag1","tag2"]}"#
    );
    assert_eq!(app.creates(), 2);
}

#[tokio::test]
async fn test_update_ignores_content_type() {
    let app = TestApp::new();
    app.create(SENSOR1).await;

    let (status, _) = send_with_content_type(
        &app.router,
        Method::PUT,
        "/sensors",
        Some(r#"{"id":1,"name":"Sensor1","location":{"latitude":5,"longitude":6}}"#),
        Some("text/plain"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send(Method::GET, "/sensors?name=Sensor1", None).await;
    assert_eq!(parse(&body)["location"], json!({"latitude": 5.0, "longitude": 6.0}));
}

#[tokio::test]
async fn test_malformed_body_without_content_type() {
    let app = TestApp::new();

    let (status, body) =
        send_with_content_type(&app.router, Method::POST, "/sensors", Some("name=Sensor1"), None)
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Invalid request payload"}"#);
    assert_eq!(app.creates(), 0);
}

#[tokio::test]
async fn test_create_with_missing_name_is_not_persisted() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/sensors", Some(r#"{"location":{"latitude":1,"longitude":2}}"#))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = parse(&body)["message"].as_str().unwrap().to_string();
    assert!(message.contains("'name'"), "unexpected message: {}", message);
    assert_eq!(app.creates(), 0);
}

#[tokio::test]
async fn test_create_with_missing_location_is_not_persisted() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::POST, "/sensors", Some(r#"{"name":"Sensor1"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse(&body)["message"].as_str().unwrap().contains("'location'"));
    assert_eq!(app.creates(), 0);
}

#[tokio::test]
async fn test_create_with_malformed_json() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::POST, "/sensors", Some(r#"{"name": "Sensor1""#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Invalid request payload"}"#);

    let (status, body) = app
        .send(
            Method::POST,
            "/sensors",
            Some(r#"{"name":"Sensor1","location":{"latitude":"north","longitude":2}}"#),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Invalid request payload"}"#);
    assert_eq!(app.creates(), 0);
}

#[tokio::test]
async fn test_update_by_id() {
    let app = TestApp::new();
    app.create(SENSOR1).await;
    app.create(r#"{"name":"Sensor2","location":{"latitude":1.0,"longitude":2.0}}"#).await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/sensors",
            Some(r#"{"id":1,"name":"Renamed","location":{"latitude":10.5,"longitude":20.5},"tags":["moved"]}"#),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "");

    let (_, body) = app.send(Method::GET, "/sensors?name=Renamed", None).await;
    assert_eq!(
        parse(&body),
        json!({"id": 1, "name": "Renamed", "location": {"latitude": 10.5, "longitude": 20.5}, "tags": ["moved"]})
    );

    let (status, _) = app.send(Method::GET, "/sensors?name=Sensor1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.send(Method::GET, "/sensors?name=Sensor2", None).await;
    assert_eq!(
        parse(&body),
        json!({"id": 2, "name": "Sensor2", "location": {"latitude": 1.0, "longitude": 2.0}, "tags": []})
    );
}

#[tokio::test]
async fn test_update_without_id() {
    let app = TestApp::new();
    app.create(SENSOR1).await;

    let (status, body) = app.send(Method::PUT, "/sensors", Some(SENSOR1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse(&body)["message"].as_str().unwrap().contains("'id'"));
    assert_eq!(app.updates(), 0);
}

#[tokio::test]
async fn test_nearest_by_coordinates() {
    let app = TestApp::new();
    app.create(r#"{"name":"berlin","location":{"latitude":52.52,"longitude":13.405}}"#).await;
    app.create(r#"{"name":"paris","location":{"latitude":48.8566,"longitude":2.3522}}"#).await;

    let (status, body) =
        app.send(Method::GET, "/sensors/nearest?latitude=48.8566&longitude=2.3522", None).await;
    assert_eq!(status, StatusCode::OK);

    let sensor: SensorMetadata = serde_json::from_str(&body).unwrap();
    assert_eq!(sensor.name, "paris");
    assert!(sensor.distance.unwrap().abs() < 1e-6);
}

#[tokio::test]
async fn test_nearest_missing_parameter() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/sensors/nearest?latitude=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Missing 'latitude' or 'longitude' parameter"}"#);
}

#[tokio::test]
async fn test_nearest_on_empty_store() {
    let app = TestApp::new();

    let (status, body) =
        app.send(Method::GET, "/sensors/nearest?latitude=1&longitude=2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"message":"No nearest sensor found"}"#);
}

#[tokio::test]
async fn test_nearest_by_city_has_same_shape() {
    let app = TestApp::new();
    app.create(r#"{"name":"berlin","location":{"latitude":52.52,"longitude":13.405}}"#).await;
    app.create(r#"{"name":"paris","location":{"latitude":48.8566,"longitude":2.3522}}"#).await;

    let (status, body) = app.send(Method::GET, "/sensors/nearest/city?city=Berlin", None).await;
    assert_eq!(status, StatusCode::OK);

    let value = parse(&body);
    assert_eq!(value["name"], "berlin");
    assert_eq!(value["id"], 1);
    assert!(value["distance"].as_f64().unwrap() > 0.0);
    assert!(value["location"].is_object());
}

#[tokio::test]
async fn test_nearest_by_city_failures() {
    let app = TestApp::new();
    app.create(SENSOR1).await;

    let (status, body) = app.send(Method::GET, "/sensors/nearest/city", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Missing 'city' parameter"}"#);

    let (status, body) = app.send(Method::GET, "/sensors/nearest/city?city=Atlantis", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"message":"No nearest sensor found"}"#);

    let (status, body) = app.send(Method::GET, "/sensors/nearest/city?city=Offline", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, r#"{"message":"Geocoding lookup failed"}"#);
}

#[tokio::test]
async fn test_nearest_by_city_without_api_key() {
    let app = TestApp::without_geocoder();
    app.create(SENSOR1).await;

    let (status, body) = app.send(Method::GET, "/sensors/nearest/city?city=Berlin", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, r#"{"message":"Geocoding lookup failed"}"#);
}

#[tokio::test]
async fn test_nearest_by_city_on_empty_store() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/sensors/nearest/city?city=Paris", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"message":"No nearest sensor found"}"#);
}

#[tokio::test]
async fn test_nearest_with_non_finite_coordinate() {
    let app = TestApp::new();
    app.create(SENSOR1).await;

    for uri in [
        "/sensors/nearest?latitude=NaN&longitude=2",
        "/sensors/nearest?latitude=1&longitude=inf",
    ] {
        let (status, body) = app.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, r#"{"message":"No nearest sensor found"}"#);
    }
}

#[tokio::test]
async fn test_storage_errors_are_not_surfaced() {
    let router = create_router(Arc::new(AppState::new(Arc::new(BrokenRepository), "memory")));

    let (status, body) = send(&router, Method::POST, "/sensors", Some(SENSOR1)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"message":"Failed to create sensor metadata"}"#);

    let (status, body) = send(&router, Method::GET, "/sensors?name=Sensor1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"message":"Sensor metadata not found"}"#);

    let (status, body) = send(
        &router,
        Method::PUT,
        "/sensors",
        Some(r#"{"id":1,"name":"Sensor1","location":{"latitude":1,"longitude":2}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"message":"Failed to update sensor metadata"}"#);
    assert!(!body.contains("connection reset"));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"status": "ok", "service": "sensor-api", "storage": "memory"}));
}
