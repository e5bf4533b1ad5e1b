use axum::{
    Extension,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::database::models::location::{CountryCode, LocationStatus};
use crate::error::AppError;
use crate::fanout::Propagation;
use crate::infrastructure::Identity;
use crate::utils::success_to_api_response;

use super::model::{LatestLocationResponse, UpdateLocationRequest, UpdateLocationResponse};

#[axum::debug_handler]
pub async fn update_location(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let country_code =
        CountryCode::parse(&req.country_code).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let status = req
        .status
        .parse::<LocationStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let report = state
        .fanout
        .report_location(&identity, country_code, status)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to update location");
            AppError::InternalServerError("Failed to update location".into())
        })?;

    if report.propagation != Propagation::Complete {
        for failure in &report.failures {
            tracing::warn!(user_id = %identity.id, %failure, "Fan-out branch failed");
        }
    }

    Ok((
        StatusCode::CREATED,
        success_to_api_response(UpdateLocationResponse {
            message: report.propagation.message().to_string(),
            location: report.location,
        }),
    ))
}

#[axum::debug_handler]
pub async fn latest_location(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let location = state
        .store
        .latest_location(identity.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to load latest location");
            AppError::InternalServerError("Failed to load location".into())
        })?
        .ok_or_else(|| AppError::NotFound("No location reported yet".into()))?;

    Ok((
        StatusCode::OK,
        success_to_api_response(LatestLocationResponse { location }),
    ))
}
