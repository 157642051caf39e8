//! Prometheus metrics for the patient API

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "patient_api_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "patient_api_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "patient_api_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "patient_api_http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "path", "status"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
    )
    .expect("Failed to register HTTP_RESPONSE_SIZE_BYTES");

    // Patient Operation Metrics

    /// Patient operations by operation and outcome class
    pub static ref PATIENT_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "patient_operations_total",
        "Total number of patient operations",
        &["operation", "status"]
    )
    .expect("Failed to register PATIENT_OPERATIONS_TOTAL");

    /// Birth date searches by resolved prefix and granularity
    ///
    /// Unresolvable input is recorded with `prefix="none"` and
    /// `granularity="none"`.
    pub static ref DATE_SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "patient_date_search_total",
        "Total number of birth date searches",
        &["prefix", "granularity", "status"]
    )
    .expect("Failed to register DATE_SEARCH_TOTAL");

    pub static ref SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "patient_search_results",
        "Number of patients returned by a birth date search",
        &["granularity"],
        vec![0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]
    )
    .expect("Failed to register SEARCH_RESULTS");
}

/// Record the outcome of one birth date search.
pub fn record_date_search(prefix: &str, granularity: &str, status: &str) {
    DATE_SEARCH_TOTAL
        .with_label_values(&[prefix, granularity, status])
        .inc();
}

/// Collapse ids in a request path so label cardinality stays bounded.
pub fn sanitize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let segments: Vec<&str> = trimmed.split('/').collect();

    match segments.as_slice() {
        [""] | [] => "/".to_string(),
        ["", "api", "patients"] => "/api/patients".to_string(),
        ["", "api", "patients", "search"] => "/api/patients/search".to_string(),
        ["", "api", "patients", _] => "/api/patients/{id}".to_string(),
        ["", "api", "patients", ..] => "/api/patients/{other}".to_string(),
        ["", first] => format!("/{}", first),
        ["", first, ..] => format!("/{}/{{other}}", first),
        _ => "{other}".to_string(),
    }
}

/// Classify a patient API request, or `None` for paths outside `/api/patients`.
pub fn extract_operation(method: &str, path: &str) -> Option<&'static str> {
    let rest = path.strip_prefix("/api/patients")?;
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

    match (method, segments.as_slice()) {
        ("POST", []) => Some("create"),
        ("GET", ["search"]) => Some("search"),
        ("GET", [_]) => Some("read"),
        ("PUT", [_]) => Some("update"),
        ("DELETE", [_]) => Some("delete"),
        _ => None,
    }
}
