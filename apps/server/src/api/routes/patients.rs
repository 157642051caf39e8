//! Patient API routes
//!
//! Mounted under `/api/patients`. The literal `/search` segment is matched
//! before `/:id`, and both forms with and without a trailing slash resolve.

use crate::api::handlers::patients;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(patients::create_patient))
        .route("/search", get(patients::search_patients))
        .route("/search/", get(patients::search_patients))
        .route(
            "/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/:id/",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
}
