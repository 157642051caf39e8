//! Business logic between handlers and storage

pub mod patient;

pub use patient::PatientService;
