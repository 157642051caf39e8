//! PUT /api/patients/{id}

use crate::support::{
    assert_operation_outcome, assert_status, patient_born, patient_id, to_json_body,
    with_test_app, PatientBuilder,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn update_replaces_names_and_resets_unsent_defaults() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let body = PatientBuilder::new()
                .family("Popova")
                .given("Elena")
                .given("Sergeevna")
                .gender("female")
                .birth_date("1992-07-04")
                .active(false)
                .build();
            let created = app.create_patient(&body).await?;
            let id = patient_id(&created)?;

            let change = PatientBuilder::new().family("Vasilieva").given("Elena").build();
            let (status, _headers, bytes) = app
                .request(
                    Method::PUT,
                    &format!("/api/patients/{id}"),
                    Some(to_json_body(&change)?),
                )
                .await?;
            assert_status(status, StatusCode::OK, "update");

            let updated: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(updated["id"], created["id"]);
            assert_eq!(updated["name"]["family"], "Vasilieva");
            assert_eq!(updated["name"]["given"], json!(["Elena"]));
            assert_eq!(updated["name"]["id"], created["name"]["id"]);
            assert_eq!(updated["name"]["use"], "official");
            assert_eq!(updated["gender"], "unknown");
            assert_eq!(updated["birthDate"], "1992-07-04T00:00:00Z");
            assert_eq!(updated["active"], true);

            let (_, _, bytes) = app
                .request(Method::GET, &format!("/api/patients/{id}"), None)
                .await?;
            let read: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(read, updated);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_applies_sent_gender_and_active() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_born("Orlova", "1988-11-30"))
                .await?;
            let id = patient_id(&created)?;
            assert_eq!(created["gender"], "unknown");
            assert_eq!(created["active"], true);

            let change = PatientBuilder::new()
                .family("Orlova")
                .gender("female")
                .active(false)
                .build();
            let (status, _headers, bytes) = app
                .request(
                    Method::PUT,
                    &format!("/api/patients/{id}"),
                    Some(to_json_body(&change)?),
                )
                .await?;
            assert_status(status, StatusCode::OK, "update gender and active");
            let updated: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(updated["gender"], "female");
            assert_eq!(updated["active"], false);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_changes_birth_date_when_sent() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_born("Sokolov", "1990-01-01"))
                .await?;
            let id = patient_id(&created)?;

            let change = patient_born("Sokolov", "1991-02-03T04:05:06Z");
            let (status, _headers, bytes) = app
                .request(
                    Method::PUT,
                    &format!("/api/patients/{id}"),
                    Some(to_json_body(&change)?),
                )
                .await?;
            assert_status(status, StatusCode::OK, "update birth date");
            let updated: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(updated["birthDate"], "1991-02-03T04:05:06Z");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_requires_family() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_born("Sokolov", "1990-01-01"))
                .await?;
            let id = patient_id(&created)?;

            let change = PatientBuilder::new().given("Only").build();
            let (status, _headers, bytes) = app
                .request(
                    Method::PUT,
                    &format!("/api/patients/{id}"),
                    Some(to_json_body(&change)?),
                )
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "update without family");
            assert_eq!(assert_operation_outcome(&bytes)?, "Name.Family is required.");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_unknown_patient_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let change = patient_born("Nobody", "1990-01-01");
            let (status, _headers, _bytes) = app
                .request(
                    Method::PUT,
                    &format!("/api/patients/{}", uuid::Uuid::new_v4()),
                    Some(to_json_body(&change)?),
                )
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "update missing");
            assert!(app.store.is_empty().await);

            Ok(())
        })
    })
    .await
}
