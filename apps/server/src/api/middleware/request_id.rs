//! Root request span, request ids and trace id response headers

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use std::time::Instant;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::{metrics::extract_operation, request_context::RequestContext};

const REQUEST_ID: &str = "x-request-id";
const CORRELATION_ID: &str = "x-correlation-id";
const TRACE_ID: &str = "x-trace-id";

/// Opens the `http_request` span every other log line nests under.
///
/// The server always assigns its own `x-request-id`. A client-supplied id is
/// echoed back as `x-correlation-id`, and the trace id as `x-trace-id`.
#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = %req.uri().path(),
        otel.kind = "server",
        http.response.status_code = tracing::field::Empty,
        patient.operation = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
)]
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let span = Span::current();
    let started = Instant::now();

    let context = RequestContext::assign(
        req.headers()
            .get(REQUEST_ID)
            .and_then(|v| v.to_str().ok()),
    );
    span.record("request_id", context.request_id.as_str());

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    if let Some(operation) = extract_operation(method.as_str(), &path) {
        span.record("patient.operation", operation);
    }
    req.extensions_mut().insert(context.clone());

    let mut response = next.run(req).await;
    let status = response.status().as_u16();
    span.record("http.response.status_code", status);
    tracing::info!(
        %method,
        %path,
        status,
        elapsed_ms = started.elapsed().as_millis(),
        "Request completed"
    );

    let headers = response.headers_mut();
    set_header(headers, REQUEST_ID, &context.request_id);
    set_header(headers, TRACE_ID, &trace_id(&span));
    if let Some(correlation_id) = &context.correlation_id {
        set_header(headers, CORRELATION_ID, correlation_id);
    }

    response
}

fn trace_id(span: &Span) -> String {
    span.context().span().span_context().trace_id().to_string()
}

/// Values that are not valid header text are skipped.
fn set_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}
