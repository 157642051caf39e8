//! Core trait for patient storage backends

use crate::{models::Patient, Result};
use async_trait::async_trait;
use patient_date_search::DatePredicate;
use uuid::Uuid;

/// Storage operations behind the patient service.
///
/// Implementations own the given-name rows of a patient together with the
/// patient itself: inserting, replacing and removing always act on both.
/// Backends are shared across request handlers as `Arc<dyn PatientStore>`.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Human-readable backend name, used in logs and `/health`
    fn backend_name(&self) -> &'static str;

    /// Persist a new patient. The caller assigns both ids.
    async fn insert(&self, patient: Patient) -> Result<Patient>;

    /// Fetch a patient with its given names
    ///
    /// # Returns
    /// * `Ok(Some(patient))` - Patient found
    /// * `Ok(None)` - No patient with that id
    async fn get(&self, id: Uuid) -> Result<Option<Patient>>;

    /// Overwrite an existing patient, replacing its given names wholesale
    ///
    /// # Returns
    /// * `Ok(Some(patient))` - The stored record after replacement
    /// * `Ok(None)` - No patient with that id
    async fn replace(&self, patient: Patient) -> Result<Option<Patient>>;

    /// Delete a patient and its given names, returning what was deleted
    async fn remove(&self, id: Uuid) -> Result<Option<Patient>>;

    /// All patients whose birth date satisfies `predicate`, ordered by
    /// birth date then id
    async fn find_by_birth_date(&self, predicate: &DatePredicate) -> Result<Vec<Patient>>;

    /// Cheap liveness probe for the health endpoint
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
