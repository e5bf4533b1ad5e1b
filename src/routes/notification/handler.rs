use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::error::AppError;
use crate::infrastructure::Identity;
use crate::utils::success_to_api_response;

use super::model::{NotificationListResponse, NotificationQuery, clamp_limit};

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = clamp_limit(query.limit.as_deref());

    let notifications = state
        .store
        .list_notifications(identity.id, limit)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to list user notifications");
            AppError::InternalServerError("Failed to list notifications".into())
        })?;

    Ok((
        StatusCode::OK,
        success_to_api_response(NotificationListResponse { notifications }),
    ))
}
