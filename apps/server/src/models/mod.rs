//! Domain models for the patient API

pub mod patient;

pub use patient::{
    NameDto, Patient, PatientRequest, PatientResponse, DEFAULT_GENDER, DEFAULT_NAME_USE,
};
