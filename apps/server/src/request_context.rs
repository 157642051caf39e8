//! Per-request context injected by the request-id middleware.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Server-assigned id, also returned as `x-request-id`
    pub request_id: String,
    /// Client-sent `x-request-id`, kept only when it differs from ours
    pub correlation_id: Option<String>,
}

impl RequestContext {
    /// Assign a fresh server id, remembering whatever the client sent.
    pub fn assign(client_id: Option<&str>) -> Self {
        let request_id = Uuid::new_v4().to_string();
        let correlation_id = client_id
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != request_id)
            .map(String::from);
        Self {
            request_id,
            correlation_id,
        }
    }
}
