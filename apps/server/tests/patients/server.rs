//! Health, metrics and cross-cutting middleware behavior

use crate::support::{
    assert_status, patient_born, to_json_body, with_test_app, with_test_app_with_config,
};
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn health_reports_storage_backend() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, bytes) = app.request(Method::GET, "/health", None).await?;
            assert_status(status, StatusCode::OK, "health");
            let body: serde_json::Value = serde_json::from_slice(&bytes)?;
            assert_eq!(body["status"], "ok");
            assert_eq!(body["storage"], "memory");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn metrics_expose_date_search_counters() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.create_patient(&patient_born("Counted", "2020-01-10"))
                .await?;
            let (status, _headers, _bytes) = app
                .request(Method::GET, "/api/patients/search?birthDate=ge2020-01", None)
                .await?;
            assert_status(status, StatusCode::OK, "search");

            let (status, headers, bytes) = app.request(Method::GET, "/metrics", None).await?;
            assert_status(status, StatusCode::OK, "metrics");
            assert!(headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("text/plain")));

            let text = String::from_utf8(bytes.to_vec())?;
            assert!(text.contains("patient_date_search_total"), "{text}");
            assert!(text.contains(r#"prefix="ge""#), "{text}");
            assert!(text.contains("patient_search_results"), "{text}");
            assert!(text.contains("patient_api_http_requests_total"), "{text}");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, headers, _bytes) = app
                .request_with_headers(
                    Method::GET,
                    "/health",
                    None,
                    &[("x-request-id", "client-123")],
                )
                .await?;
            assert_status(status, StatusCode::OK, "health");

            let request_id = headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            assert!(uuid::Uuid::parse_str(request_id).is_ok());
            assert_eq!(
                headers.get("x-correlation-id").and_then(|v| v.to_str().ok()),
                Some("client-123")
            );
            assert_eq!(
                headers
                    .get("x-content-type-options")
                    .and_then(|v| v.to_str().ok()),
                Some("nosniff")
            );
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn error_bodies_are_json_operation_outcomes() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, headers, _bytes) = app
                .request(Method::GET, "/api/patients/search?birthDate=nope", None)
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "bad search");
            assert!(headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json")));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn oversized_bodies_are_rejected() -> anyhow::Result<()> {
    with_test_app_with_config(
        |config| config.server.max_request_body_size = 64,
        |app| {
            Box::pin(async move {
                let mut body = patient_born("Oversized", "1990-01-01");
                body["name"]["given"] = serde_json::json!(["x".repeat(256)]);
                let (status, _headers, _bytes) = app
                    .request(Method::POST, "/api/patients", Some(to_json_body(&body)?))
                    .await?;
                assert_ne!(status, StatusCode::CREATED);
                assert!(status.is_client_error(), "got {status}");
                assert!(app.store.is_empty().await);
                Ok(())
            })
        },
    )
    .await
}
