//! POST /api/patients

use crate::support::{
    assert_operation_outcome, assert_status, patient_born, patient_id, to_json_body,
    with_test_app, PatientBuilder,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn create_assigns_id_and_location() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let body = patient_born("Ivanov", "1990-05-12T10:30:00");
            let (status, headers, bytes) = app
                .request(Method::POST, "/api/patients", Some(to_json_body(&body)?))
                .await?;

            assert_status(status, StatusCode::CREATED, "create");
            let created: serde_json::Value = serde_json::from_slice(&bytes)?;
            let id = patient_id(&created)?;
            assert!(uuid::Uuid::parse_str(&id).is_ok(), "id should be a UUID: {id}");

            let location = headers
                .get("location")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            assert_eq!(location, format!("/api/patients/{id}"));
            assert_eq!(app.store.len().await, 1);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_applies_defaults_and_keeps_given_order() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_born("Ivanov", "1990-05-12"))
                .await?;

            assert_eq!(created["name"]["use"], "official");
            assert_eq!(created["gender"], "unknown");
            assert_eq!(created["active"], true);
            assert_eq!(created["name"]["given"], json!(["Ivan", "Ivanovich"]));
            assert_eq!(created["birthDate"], "1990-05-12T00:00:00Z");
            assert!(created["name"]["id"].is_string());

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_keeps_client_supplied_name_fields() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let name_id = "0b7f8f8e-2d3c-4a8b-9a35-3c2f0b9f6e11";
            let body = PatientBuilder::new()
                .name_id(name_id)
                .name_use("usual")
                .family("Smirnova")
                .given("Anna")
                .gender("female")
                .birth_date("1985-03-01T08:00:00+03:00")
                .active(false)
                .build();
            let created = app.create_patient(&body).await?;

            assert_eq!(created["name"]["id"], name_id);
            assert_eq!(created["name"]["use"], "usual");
            assert_eq!(created["gender"], "female");
            assert_eq!(created["active"], false);
            // Offsets are normalized to UTC.
            assert_eq!(created["birthDate"], "1985-03-01T05:00:00Z");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_requires_family_and_birth_date() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let missing_family = PatientBuilder::new().birth_date("1990-01-01").build();
            let missing_birth_date = PatientBuilder::new().family("Ivanov").build();

            for body in [missing_family, missing_birth_date] {
                let (status, _headers, bytes) = app
                    .request(Method::POST, "/api/patients", Some(to_json_body(&body)?))
                    .await?;
                assert_status(status, StatusCode::BAD_REQUEST, "create invalid");
                assert_eq!(
                    assert_operation_outcome(&bytes)?,
                    "Name.Family and BirthDate are required fields."
                );
            }
            assert!(app.store.is_empty().await);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_rejects_malformed_json_and_dates() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, bytes) = app
                .request(
                    Method::POST,
                    "/api/patients",
                    Some(axum::body::Bytes::from_static(b"{not json")),
                )
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "malformed json");
            assert!(assert_operation_outcome(&bytes)?.starts_with("Invalid JSON"));

            let body = patient_born("Ivanov", "12/05/1990");
            let (status, _headers, _bytes) = app
                .request(Method::POST, "/api/patients", Some(to_json_body(&body)?))
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "bad birthDate");

            Ok(())
        })
    })
    .await
}
