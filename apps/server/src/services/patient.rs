//! Patient CRUD and birth date search
//!
//! Owns request-to-record mapping (defaults and update fallbacks) and turns
//! a `birthDate` search expression into a store query through `DateSearch`.

use patient_date_search::{DateSearch, DateSearchError};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::PatientStore,
    metrics,
    models::{Patient, PatientRequest, PatientResponse, DEFAULT_GENDER, DEFAULT_NAME_USE},
    Error, Result,
};

const CREATE_REQUIRED: &str = "Name.Family and BirthDate are required fields.";

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
    date_search: DateSearch,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>, date_search: DateSearch) -> Self {
        Self { store, date_search }
    }

    pub fn store(&self) -> &Arc<dyn PatientStore> {
        &self.store
    }

    pub async fn create(&self, request: PatientRequest) -> Result<PatientResponse> {
        if request.name.family.trim().is_empty() {
            return Err(Error::Validation(CREATE_REQUIRED.to_string()));
        }
        let birth_date = request
            .birth_date
            .ok_or_else(|| Error::Validation(CREATE_REQUIRED.to_string()))?;

        let patient = Patient {
            id: Uuid::new_v4(),
            name_id: request.name.id.unwrap_or_else(Uuid::new_v4),
            name_use: request
                .name
                .name_use
                .unwrap_or_else(|| DEFAULT_NAME_USE.to_string()),
            family: request.name.family,
            given: request.name.given,
            gender: request.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            birth_date,
            active: request.active.unwrap_or(true),
        };

        let stored = self.store.insert(patient).await?;
        tracing::info!(patient_id = %stored.id, "Patient created");
        Ok(stored.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<PatientResponse>> {
        Ok(self.store.get(id).await?.map(PatientResponse::from))
    }

    /// Replace a patient. `family` and `given` come from the request. An absent
    /// `name.id`, `name.use` or `birthDate` keeps the stored value, while an
    /// absent `gender` or `active` resets to its create-time default.
    pub async fn update(
        &self,
        id: Uuid,
        request: PatientRequest,
    ) -> Result<Option<PatientResponse>> {
        request.name.validate()?;

        let Some(existing) = self.store.get(id).await? else {
            return Ok(None);
        };

        let patient = Patient {
            id,
            name_id: request.name.id.unwrap_or(existing.name_id),
            name_use: request.name.name_use.unwrap_or(existing.name_use),
            family: request.name.family,
            given: request.name.given,
            gender: request.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            birth_date: request.birth_date.unwrap_or(existing.birth_date),
            active: request.active.unwrap_or(true),
        };

        let updated = self.store.replace(patient).await?;
        if updated.is_some() {
            tracing::info!(patient_id = %id, "Patient updated");
        }
        Ok(updated.map(PatientResponse::from))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<PatientResponse>> {
        let removed = self.store.remove(id).await?;
        if removed.is_some() {
            tracing::info!(patient_id = %id, "Patient deleted");
        }
        Ok(removed.map(PatientResponse::from))
    }

    /// Resolve `input` (e.g. `ge2020-01`) and return matching patients
    /// ordered by birth date.
    pub async fn search_by_birth_date(&self, input: &str) -> Result<Vec<PatientResponse>> {
        let resolution = match self.date_search.resolve(input) {
            Ok(resolution) => resolution,
            Err(e) => {
                let status = match e {
                    DateSearchError::Internal(_) => "error",
                    _ => "invalid",
                };
                metrics::record_date_search("none", "none", status);
                tracing::debug!(input = %input, error = %e, "Birth date search rejected");
                return Err(e.into());
            }
        };

        let prefix = resolution.prefix.as_str();
        let granularity = resolution.parsed.granularity.as_str();

        let patients = match self.store.find_by_birth_date(&resolution.predicate).await {
            Ok(patients) => patients,
            Err(e) => {
                metrics::record_date_search(prefix, granularity, "error");
                return Err(e);
            }
        };

        metrics::record_date_search(prefix, granularity, "success");
        metrics::SEARCH_RESULTS
            .with_label_values(&[granularity])
            .observe(patients.len() as f64);
        tracing::debug!(
            prefix,
            granularity,
            predicate = ?resolution.predicate,
            results = patients.len(),
            "Birth date search"
        );

        Ok(patients.into_iter().map(PatientResponse::from).collect())
    }
}
