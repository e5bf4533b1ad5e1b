use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::AppState;
use crate::utils::{error_codes, error_to_api_response, success_to_api_response};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            success_to_api_response(HealthResponse {
                status: "healthy",
                timestamp: chrono::Utc::now().timestamp(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                error_to_api_response(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Database connection failed".to_string(),
                ),
            )
        }
    }
}
