use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use sensor_store::geocoding::MapboxGeocoder;
use sensor_store::memory::MemorySensorStore;
use sensor_store::ports::{Geocoder, SensorRepository};
use sensor_store::postgres::{PostgresConfig, PostgresStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensor_api::config::ApiConfig;
use sensor_api::router::create_router;
use sensor_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensor_api=info,sensor_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env().context("Invalid configuration")?;

    tracing::info!(
        port = config.port,
        postgres = config.uses_postgres(),
        geocoder = %config.geocoder.base_url,
        "Starting sensor metadata API server"
    );

    let geocoder: Option<Arc<dyn Geocoder>> = match &config.geocoder.api_key {
        Some(api_key) => {
            Some(Arc::new(MapboxGeocoder::new(config.geocoder.base_url.clone(), api_key.clone())))
        }
        None => {
            tracing::warn!("API_KEY not set; nearest-by-city lookups will fail");
            None
        }
    };

    // Initialize storage backend based on DB_HOST environment variable
    let (repository, storage): (Arc<dyn SensorRepository>, &'static str) = match &config.database
    {
        Some(database) => {
            tracing::info!("DB_HOST found, connecting to PostgreSQL...");
            match init_postgres_storage(database, geocoder).await {
                Ok(store) => {
                    tracing::info!("Connected to PostgreSQL");
                    (store, "postgres")
                }
                Err(e) => {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    tracing::error!(
                        "Remediation:\n\
                        1. Ensure PostgreSQL is running\n\
                        2. Verify DB_HOST, DB_PORT, DB_NAME, DB_USER and DB_PASSWORD\n\
                        3. Apply crates/sensor-store/schema.sql (needs the earthdistance extension)"
                    );
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("Using in-memory storage (set DB_HOST for PostgreSQL)");
            let mut store = MemorySensorStore::new();
            if let Some(geocoder) = geocoder {
                store = store.with_geocoder(geocoder);
            }
            (Arc::new(store), "memory")
        }
    };

    let state = Arc::new(AppState::new(repository, storage));

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN '{}'", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Initialize PostgreSQL storage from the environment configuration
async fn init_postgres_storage(
    config: &PostgresConfig,
    geocoder: Option<Arc<dyn Geocoder>>,
) -> Result<Arc<PostgresStore>, String> {
    let mut store =
        PostgresStore::new(config).await.map_err(|e| format!("Connection failed: {}", e))?;

    if let Some(geocoder) = geocoder {
        store = store.with_geocoder(geocoder);
    }

    Ok(Arc::new(store))
}
