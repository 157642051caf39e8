//! PostgreSQL patient store
//!
//! Patients live in `patients`; given names live in `patient_given_names`
//! keyed by `(patient_id, position)` so their order survives a round trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use patient_date_search::DatePredicate;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{PgConnection, Row};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use super::traits::PatientStore;
use crate::{config::DatabaseConfig, models::Patient, Error, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const PATIENT_COLUMNS: &str =
    "id, name_id, name_use, family, gender, birth_date, active";

#[derive(Debug, Clone)]
pub struct PgPatientStore {
    pool: PgPool,
}

impl PgPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized by `config`, applying migrations when configured.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min_size)
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(Error::Database)?;

        let store = Self::new(pool);
        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn write_given_names(
        conn: &mut PgConnection,
        patient_id: Uuid,
        given: &[String],
    ) -> Result<()> {
        if given.is_empty() {
            return Ok(());
        }
        sqlx::query(
            r#"
            INSERT INTO patient_given_names (patient_id, position, value)
            SELECT $1, (g.ordinality - 1)::int, g.value
            FROM UNNEST($2::text[]) WITH ORDINALITY AS g(value, ordinality)
            "#,
        )
        .bind(patient_id)
        .bind(given)
        .execute(conn)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    /// Attach given names to freshly loaded rows, preserving row order.
    async fn hydrate(&self, rows: Vec<PgRow>) -> Result<Vec<Patient>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut patients = rows
            .iter()
            .map(patient_from_row)
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(Error::Database)?;

        let ids: Vec<Uuid> = patients.iter().map(|p| p.id).collect();
        let name_rows = sqlx::query(
            r#"
            SELECT patient_id, value
            FROM patient_given_names
            WHERE patient_id = ANY($1)
            ORDER BY patient_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut given: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in name_rows {
            let patient_id: Uuid = row.try_get("patient_id").map_err(Error::Database)?;
            let value: String = row.try_get("value").map_err(Error::Database)?;
            given.entry(patient_id).or_default().push(value);
        }

        for patient in &mut patients {
            patient.given = given.remove(&patient.id).unwrap_or_default();
        }
        Ok(patients)
    }
}

fn patient_from_row(row: &PgRow) -> std::result::Result<Patient, sqlx::Error> {
    Ok(Patient {
        id: row.try_get("id")?,
        name_id: row.try_get("name_id")?,
        name_use: row.try_get("name_use")?,
        family: row.try_get("family")?,
        given: Vec::new(),
        gender: row.try_get("gender")?,
        birth_date: row.try_get("birth_date")?,
        active: row.try_get("active")?,
    })
}

/// Render `predicate` as a condition on `patients.birth_date`.
///
/// Bound values are appended to `binds`; placeholders are numbered from the
/// length of `binds` so the clause can follow other bound conditions.
pub fn birth_date_clause(predicate: &DatePredicate, binds: &mut Vec<DateTime<Utc>>) -> String {
    let mut push = |value: DateTime<Utc>| -> usize {
        binds.push(value);
        binds.len()
    };

    match *predicate {
        DatePredicate::InRange { start, end } => {
            let s_idx = push(start);
            let e_idx = push(end);
            format!(
                "(birth_date >= ${}::timestamptz AND birth_date < ${}::timestamptz)",
                s_idx, e_idx
            )
        }
        DatePredicate::OutsideRange { start, end } => {
            let s_idx = push(start);
            let e_idx = push(end);
            format!(
                "(birth_date < ${}::timestamptz OR birth_date >= ${}::timestamptz)",
                s_idx, e_idx
            )
        }
        DatePredicate::Before(t) => format!("birth_date < ${}::timestamptz", push(t)),
        DatePredicate::AtOrBefore(t) => format!("birth_date <= ${}::timestamptz", push(t)),
        DatePredicate::After(t) => format!("birth_date > ${}::timestamptz", push(t)),
        DatePredicate::AtOrAfter(t) => format!("birth_date >= ${}::timestamptz", push(t)),
        DatePredicate::Exactly(t) => format!("birth_date = ${}::timestamptz", push(t)),
        DatePredicate::Not(t) => format!("birth_date <> ${}::timestamptz", push(t)),
        DatePredicate::Within { lower, upper } => {
            let l_idx = push(lower);
            let u_idx = push(upper);
            format!(
                "(birth_date >= ${}::timestamptz AND birth_date <= ${}::timestamptz)",
                l_idx, u_idx
            )
        }
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, patient: Patient) -> Result<Patient> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            r#"
            INSERT INTO patients (id, name_id, name_use, family, gender, birth_date, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(patient.id)
        .bind(patient.name_id)
        .bind(&patient.name_use)
        .bind(&patient.family)
        .bind(&patient.gender)
        .bind(patient.birth_date)
        .bind(patient.active)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        Self::write_given_names(&mut tx, patient.id, &patient.given).await?;
        tx.commit().await.map_err(Error::Database)?;

        Ok(patient)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Patient>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM patients WHERE id = $1",
            PATIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn replace(&self, patient: Patient) -> Result<Option<Patient>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let updated = sqlx::query(
            r#"
            UPDATE patients
            SET name_id = $2,
                name_use = $3,
                family = $4,
                gender = $5,
                birth_date = $6,
                active = $7,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(patient.id)
        .bind(patient.name_id)
        .bind(&patient.name_use)
        .bind(&patient.family)
        .bind(&patient.gender)
        .bind(patient.birth_date)
        .bind(patient.active)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await.map_err(Error::Database)?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM patient_given_names WHERE patient_id = $1")
            .bind(patient.id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        Self::write_given_names(&mut tx, patient.id, &patient.given).await?;
        tx.commit().await.map_err(Error::Database)?;

        Ok(Some(patient))
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Patient>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        // Given names go with the row via ON DELETE CASCADE.
        let deleted = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        Ok((deleted > 0).then_some(existing))
    }

    async fn find_by_birth_date(&self, predicate: &DatePredicate) -> Result<Vec<Patient>> {
        let mut binds = Vec::new();
        let clause = birth_date_clause(predicate, &mut binds);
        let sql = format!(
            "SELECT {} FROM patients WHERE {} ORDER BY birth_date, id",
            PATIENT_COLUMNS, clause
        );
        tracing::debug!(sql = %sql, binds = binds.len(), "Birth date query");

        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        self.hydrate(rows).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
