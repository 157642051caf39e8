//! Per-request HTTP and patient operation metrics

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use prometheus::IntGauge;
use std::time::Instant;

use crate::metrics::{
    extract_operation, sanitize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION_SECONDS, HTTP_RESPONSE_SIZE_BYTES, PATIENT_OPERATIONS_TOTAL,
};

/// Decrements the in-flight gauge even when the request future is dropped.
struct InFlight(IntGauge);

impl InFlight {
    fn enter(gauge: IntGauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.dec();
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_owned();
    let operation = extract_operation(&method, req.uri().path());
    let route = sanitize_path(req.uri().path());

    let _in_flight = InFlight::enter(
        HTTP_REQUESTS_IN_FLIGHT.with_label_values(&[method.as_str(), route.as_str()]),
    );

    let response = next.run(req).await;
    let status = response.status();
    let code = status.as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &route, &code])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &route])
        .observe(started.elapsed().as_secs_f64());

    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok());
    if let Some(size) = size {
        HTTP_RESPONSE_SIZE_BYTES
            .with_label_values(&[&method, &route, &code])
            .observe(size);
    }

    if let Some(operation) = operation {
        PATIENT_OPERATIONS_TOTAL
            .with_label_values(&[operation, outcome(status)])
            .inc();
    }

    response
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_success() {
        "success"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "server_error"
    }
}
