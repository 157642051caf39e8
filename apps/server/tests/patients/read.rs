//! GET /api/patients/{id}

use crate::support::{
    assert_operation_outcome, assert_status, patient_born, patient_id, with_test_app,
};
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn read_returns_created_patient() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_born("Kuznetsov", "1978-11-30"))
                .await?;
            let id = patient_id(&created)?;

            let (status, _headers, bytes) = app
                .request(Method::GET, &format!("/api/patients/{id}"), None)
                .await?;
            assert_status(status, StatusCode::OK, "read");
            let read: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(read, created);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn read_unknown_patient_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = uuid::Uuid::new_v4();
            let (status, _headers, bytes) = app
                .request(Method::GET, &format!("/api/patients/{id}"), None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "read missing");
            assert!(assert_operation_outcome(&bytes)?.contains(&id.to_string()));

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn read_with_malformed_id_is_bad_request() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, bytes) = app
                .request(Method::GET, "/api/patients/not-a-uuid", None)
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "read malformed id");
            assert_eq!(
                assert_operation_outcome(&bytes)?,
                "Invalid patient id: not-a-uuid"
            );

            Ok(())
        })
    })
    .await
}
