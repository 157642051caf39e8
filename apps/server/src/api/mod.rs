//! HTTP surface: router assembly, service endpoints and middleware

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::{config::ServerConfig, state::AppState};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;

const SERVICE_NAME: &str = "patient-api";

/// Build the application router with its full middleware stack.
pub fn create_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .merge(routes::metrics::metrics_routes())
        .nest("/api/patients", routes::patients::patient_routes())
        .with_state(state);

    with_middleware(app, &server)
}

/// Outermost layer last: the body limit sees the request first and the
/// security headers are stamped on the way out.
fn with_middleware(app: Router, server: &ServerConfig) -> Router {
    app.layer(axum::middleware::from_fn(
        middleware::security_headers_middleware,
    ))
    .layer(axum::middleware::from_fn(middleware::request_id_middleware))
    .layer(axum::middleware::from_fn(middleware::metrics_middleware))
    .layer(middleware::compression())
    .layer(middleware::cors(&server.cors_origins))
    .layer(DefaultBodyLimit::max(server.max_request_body_size))
}

/// 200 when the patient store answers, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> Response {
    let store = state.patient_service.store();
    let (status, label) = match store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, backend = store.backend_name(), "Store ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let body = json!({
        "status": label,
        "service": SERVICE_NAME,
        "storage": store.backend_name(),
    });
    (status, Json(body)).into_response()
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "server": "Patient API",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/api/patients", "/api/patients/search?birthDate=", "/health", "/metrics"],
    }))
}
