//! In-process patient store
//!
//! Backs the default `memory` storage backend and the integration tests.
//! Contents are lost on restart.

use async_trait::async_trait;
use patient_date_search::DatePredicate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::PatientStore;
use crate::{models::Patient, Error, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryPatientStore {
    patients: Arc<RwLock<HashMap<Uuid, Patient>>>,
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.patients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.patients.read().await.is_empty()
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, patient: Patient) -> Result<Patient> {
        let mut patients = self.patients.write().await;
        if patients.contains_key(&patient.id) {
            return Err(Error::Internal(format!(
                "Patient {} already exists",
                patient.id
            )));
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Patient>> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn replace(&self, patient: Patient) -> Result<Option<Patient>> {
        let mut patients = self.patients.write().await;
        match patients.get_mut(&patient.id) {
            Some(existing) => {
                *existing = patient.clone();
                Ok(Some(patient))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Patient>> {
        Ok(self.patients.write().await.remove(&id))
    }

    async fn find_by_birth_date(&self, predicate: &DatePredicate) -> Result<Vec<Patient>> {
        let patients = self.patients.read().await;
        let mut matches: Vec<Patient> = patients
            .values()
            .filter(|p| predicate.matches(&p.birth_date))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.birth_date.cmp(&b.birth_date).then(a.id.cmp(&b.id)));
        Ok(matches)
    }
}
