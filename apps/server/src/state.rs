//! Shared application state

use patient_date_search::DateSearch;
use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    db::{MemoryPatientStore, PatientStore, PgPatientStore},
    services::PatientService,
    Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub patient_service: Arc<PatientService>,
}

impl AppState {
    /// Build state for `config`, connecting to PostgreSQL when that backend
    /// is selected.
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn PatientStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryPatientStore::new()),
            StorageBackend::Postgres => {
                tracing::info!(
                    pool_max_size = config.database.pool_max_size,
                    run_migrations = config.database.run_migrations,
                    "Connecting to PostgreSQL"
                );
                Arc::new(PgPatientStore::connect(&config.database).await?)
            }
        };
        tracing::info!(backend = store.backend_name(), "Patient store ready");

        Ok(Self::with_store(config, store, DateSearch::new()))
    }

    /// Build state around an existing store; tests use this with a fixed clock.
    pub fn with_store(
        config: Config,
        store: Arc<dyn PatientStore>,
        date_search: DateSearch,
    ) -> Self {
        Self {
            config: Arc::new(config),
            patient_service: Arc::new(PatientService::new(store, date_search)),
        }
    }
}
