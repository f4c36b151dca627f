//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::debug;

use super::AppState;
use super::types::{CatalogResponse, ErrorResponse};
use crate::profile::LoadProfile;
use crate::report::{SizingReport, size_profile};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// Returns the appliance, location, and backup option lists.
///
/// `GET /catalog` → 200 + `CatalogResponse` JSON
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse::from(&state.catalog))
}

/// Sizes a load profile.
///
/// `POST /sizing` → 200 + `SizingReport` JSON
/// Malformed or invalid profile → 400 + `ErrorResponse`
pub async fn post_sizing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoadProfile>, JsonRejection>,
) -> Result<Json<SizingReport>, ApiError> {
    let Json(mut profile) = payload.map_err(|e| bad_request(e.body_text()))?;
    profile.validate().map_err(|e| bad_request(e.to_string()))?;
    profile.assign_custom_ids();

    let report = size_profile(&profile, &state.catalog);
    debug!(
        total_wattage = report.result.total_wattage,
        kva = report.result.inverter_size_kva,
        "sizing request served"
    );
    Ok(Json(report))
}
