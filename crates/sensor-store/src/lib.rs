//! Sensor Store - Storage ports and adapters
//!
//! This crate defines the repository and geocoder ports and provides the
//! PostgreSQL, in-memory, and Mapbox adapter implementations.

pub mod geocoding;
pub mod memory;
pub mod ports;
pub mod postgres;
