//! Database layer - patient storage backends

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::MemoryPatientStore;
pub use postgres::{birth_date_clause, PgPatientStore};
pub use traits::PatientStore;
