use axum::{
    Extension,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::error::AppError;
use crate::infrastructure::Identity;
use crate::utils::success_to_api_response;

use super::model::{PushTokenResponse, UpdatePushTokenRequest};

#[axum::debug_handler]
pub async fn update_push_token(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<UpdatePushTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let push_token = req.normalized();

    let updated = state
        .store
        .update_push_token(identity.id, push_token)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to update push token");
            AppError::InternalServerError("Failed to update push token".into())
        })?;
    if !updated {
        return Err(AppError::NotFound("User not found".into()));
    }

    let message = match push_token {
        Some(_) => "Push token updated",
        None => "Push token cleared",
    };
    tracing::debug!(user_id = %identity.id, message, "Push token changed");

    Ok((
        StatusCode::OK,
        success_to_api_response(PushTokenResponse {
            message: message.to_string(),
        }),
    ))
}
