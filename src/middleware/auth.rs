use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::AppState;
use crate::error::AppError;

/// 校验 Bearer token，写入用户记录，把 `Identity` 放进请求扩展
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Unauthorized("Authorization header required".into()))?;

    let identity = state.verifier.verify(bearer.token()).await.map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        AppError::Unauthorized("Invalid token".into())
    })?;

    // 成员关系和通知都引用 users 表，先保证用户存在
    state
        .store
        .upsert_user(identity.id, &identity.email, &identity.name)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to upsert user");
            AppError::InternalServerError("Failed to load user".into())
        })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
