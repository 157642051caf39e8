//! Patient API server
//!
//! HTTP service exposing patient CRUD and FHIR-style birth date search:
//! - `/api/patients` create, read, update and delete
//! - `/api/patients/search?birthDate=<prefix><date>` using `patient-date-search`
//! - In-memory or PostgreSQL storage
//! - Prometheus metrics and OpenTelemetry tracing

#![allow(
    clippy::large_enum_variant,      // sqlx/migrate errors are large; boxing adds noise at every `?`
)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
