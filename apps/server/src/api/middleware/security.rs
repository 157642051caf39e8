//! Security headers middleware

use axum::{
    extract::Request,
    http::{HeaderValue, Uri},
    middleware::Next,
    response::Response,
};

/// Sent on every response; the API never serves markup or cacheable data.
const BASELINE: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", "default-src 'none'"),
    ("cache-control", "no-store"),
];

const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Adds the baseline hardening headers, plus HSTS behind HTTPS.
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let https = is_https(
        req.headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok()),
        req.uri(),
    );

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in BASELINE {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    if https {
        headers.insert("strict-transport-security", HeaderValue::from_static(HSTS));
    }
    response
}

/// A terminating proxy reports the original scheme in `x-forwarded-proto`.
fn is_https(forwarded_proto: Option<&str>, uri: &Uri) -> bool {
    forwarded_proto
        .or_else(|| uri.scheme_str())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https"))
}
