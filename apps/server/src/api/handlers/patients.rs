//! Patient CRUD and search handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::extractors::JsonBody, models::PatientRequest, request_context::RequestContext,
    state::AppState, Error, Result,
};

#[derive(Debug, Deserialize)]
pub struct BirthDateQuery {
    #[serde(rename = "birthDate", default)]
    pub birth_date: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::Validation(format!("Invalid patient id: {}", raw)))
}

/// POST /api/patients
pub async fn create_patient(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    JsonBody(request): JsonBody<PatientRequest>,
) -> Result<Response> {
    let created = state.patient_service.create(request).await?;

    if let Some(Extension(context)) = context {
        tracing::debug!(
            request_id = %context.request_id,
            patient_id = %created.id,
            "Create handled"
        );
    }

    let location = format!("/api/patients/{}", created.id);
    let mut response = (StatusCode::CREATED, Json(created)).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    Ok(response)
}

/// GET /api/patients/{id}
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let patient = state
        .patient_service
        .get(id)
        .await?
        .ok_or(Error::PatientNotFound(id))?;
    Ok(Json(patient).into_response())
}

/// PUT /api/patients/{id}
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<PatientRequest>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let patient = state
        .patient_service
        .update(id, request)
        .await?
        .ok_or(Error::PatientNotFound(id))?;
    Ok(Json(patient).into_response())
}

/// DELETE /api/patients/{id}
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let patient = state
        .patient_service
        .delete(id)
        .await?
        .ok_or(Error::PatientNotFound(id))?;
    Ok(Json(patient).into_response())
}

/// GET /api/patients/search?birthDate=...
///
/// A missing `birthDate` parameter is treated the same as an empty one.
pub async fn search_patients(
    State(state): State<AppState>,
    Query(query): Query<BirthDateQuery>,
) -> Result<Response> {
    let input = query.birth_date.unwrap_or_default();
    let patients = state.patient_service.search_by_birth_date(&input).await?;
    Ok(Json(patients).into_response())
}
