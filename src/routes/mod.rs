use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::middleware::{auth_middleware, log_errors};

pub mod group;
pub mod health;
pub mod location;
pub mod notification;
pub mod user;

pub const API_BASE_URI: &str = "/api/v1";

/// 组装所有路由，`/healthz` 公开，其余都需要认证
pub fn app(state: AppState) -> Router {
    let public_routes = Router::new().route("/healthz", get(health::health_check));

    let protected_routes = Router::new()
        // 群组路由
        .route("/groups", post(group::create_group).get(group::list_groups))
        .route("/groups/{id}/join", post(group::join_group))
        .route("/groups/{id}/members", get(group::get_group_members))
        // 位置路由
        .route("/locations", post(location::update_location))
        .route("/locations/latest", get(location::latest_location))
        // 通知路由
        .route("/notifications", get(notification::list_notifications))
        // 用户路由
        .route("/users/me/push-token", put(user::update_push_token))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest(API_BASE_URI, protected_routes)
        .layer(axum::middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
