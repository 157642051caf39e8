use anyhow::Context as _;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;

/// Assert a status code, printing the context on failure
pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// Assert that a body is an OperationOutcome and return its diagnostics
pub fn assert_operation_outcome(body: &Bytes) -> anyhow::Result<String> {
    let value: Value = serde_json::from_slice(body).context("parse OperationOutcome")?;
    assert_eq!(
        value.get("resourceType").and_then(|v| v.as_str()),
        Some("OperationOutcome"),
        "expected OperationOutcome, got {value}"
    );
    let diagnostics = value["issue"][0]["diagnostics"]
        .as_str()
        .context("issue[0].diagnostics is a string")?;
    Ok(diagnostics.to_string())
}

/// Family names of a search result array, in response order
pub fn families(results: &Value) -> anyhow::Result<Vec<String>> {
    let array = results.as_array().context("search result is an array")?;
    array
        .iter()
        .map(|p| {
            p["name"]["family"]
                .as_str()
                .map(str::to_string)
                .context("name.family is a string")
        })
        .collect()
}

/// The `id` of a patient response
pub fn patient_id(patient: &Value) -> anyhow::Result<String> {
    patient["id"]
        .as_str()
        .map(str::to_string)
        .context("patient has a string id")
}
