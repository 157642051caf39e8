//! Request handlers for API endpoints
//!
//! Handlers extract and parse request input, call the patient service and
//! shape the HTTP response. Errors are rendered by `crate::Error`.

pub mod metrics;
pub mod patients;

pub use metrics::*;
pub use patients::*;
