//! Sensor Core - Domain models, errors, and validation
//!
//! This crate contains the data model shared by the storage adapters and the
//! HTTP API, plus the field validation framework used on inbound payloads.

pub mod error;
pub mod models;
pub mod validation;

pub use error::{Result, SensorError};
