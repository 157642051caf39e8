//! DELETE /api/patients/{id}

use crate::support::{assert_status, patient_born, patient_id, with_test_app};
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn delete_returns_deleted_patient_then_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_born("Vasiliev", "2001-09-09"))
                .await?;
            let id = patient_id(&created)?;
            let path = format!("/api/patients/{id}");

            let (status, _headers, bytes) = app.request(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::OK, "delete");
            let deleted: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(deleted, created);

            let (status, _headers, _bytes) = app.request(Method::GET, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "read after delete");

            let (status, _headers, _bytes) = app.request(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "second delete");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_leaves_other_patients() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let keep = app
                .create_patient(&patient_born("Keep", "1970-01-01"))
                .await?;
            let drop = app
                .create_patient(&patient_born("Drop", "1970-01-02"))
                .await?;

            let (status, _headers, _bytes) = app
                .request(
                    Method::DELETE,
                    &format!("/api/patients/{}", patient_id(&drop)?),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "delete one");

            assert_eq!(app.store.len().await, 1);
            let (status, _headers, _bytes) = app
                .request(
                    Method::GET,
                    &format!("/api/patients/{}", patient_id(&keep)?),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "other patient still readable");

            Ok(())
        })
    })
    .await
}
