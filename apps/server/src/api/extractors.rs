//! Custom Axum extractors for patient request bodies.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::Error;

/// JSON body extractor whose rejections render as an `OperationOutcome`
/// instead of axum's plain-text `JsonRejection`.
///
/// The content type is not enforced; a missing or non-JSON `Content-Type`
/// is parsed as JSON anyway.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::Validation(format!("Failed to read request body: {}", e)))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Validation("Request body is required".to_string()));
        }

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Validation(format!("Invalid JSON in request body: {}", e)))?;

        Ok(JsonBody(value))
    }
}
