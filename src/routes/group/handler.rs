use axum::{
    Extension,
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::fanout::MembershipResolver;
use crate::infrastructure::Identity;
use crate::utils::success_to_api_response;

use super::model::{
    CreateGroupRequest, GroupListResponse, GroupMembersResponse, GroupResponse, JoinGroupResponse,
    MAX_GROUP_NAME_LEN, MemberInfo,
};

fn parse_group_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid group ID".into()))
}

#[axum::debug_handler]
pub async fn create_group(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let name = req.name.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_GROUP_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be between 1 and {MAX_GROUP_NAME_LEN} characters"
        )));
    }

    let group = state
        .store
        .create_group(name, identity.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to create group");
            AppError::InternalServerError("Failed to create group".into())
        })?;

    // 创建者入群失败不影响建群结果，由后台对账补回
    if let Err(e) = state.store.add_group_member(group.id, identity.id).await {
        tracing::error!(
            group_id = %group.id,
            user_id = %identity.id,
            error = %e,
            "Failed to add creator to group"
        );
    }

    tracing::info!(group_id = %group.id, user_id = %identity.id, "Group created");
    Ok((
        StatusCode::CREATED,
        success_to_api_response(GroupResponse { group }),
    ))
}

#[axum::debug_handler]
pub async fn list_groups(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let groups = MembershipResolver::new(state.store.as_ref())
        .groups_for(identity.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %identity.id, error = %e, "Failed to list user groups");
            AppError::InternalServerError("Failed to list groups".into())
        })?;

    Ok((
        StatusCode::OK,
        success_to_api_response(GroupListResponse { groups }),
    ))
}

#[axum::debug_handler]
pub async fn join_group(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let group_id = parse_group_id(&group_id)?;

    let group = state.store.get_group(group_id).await.map_err(|e| {
        tracing::error!(group_id = %group_id, error = %e, "Failed to load group");
        AppError::InternalServerError("Failed to join group".into())
    })?;
    if group.is_none() {
        return Err(AppError::NotFound("Group not found".into()));
    }

    state
        .store
        .add_group_member(group_id, identity.id)
        .await
        .map_err(|e| {
            tracing::error!(
                group_id = %group_id,
                user_id = %identity.id,
                error = %e,
                "Failed to join group"
            );
            AppError::InternalServerError("Failed to join group".into())
        })?;

    Ok((
        StatusCode::OK,
        success_to_api_response(JoinGroupResponse {
            message: "Successfully joined group".into(),
        }),
    ))
}

#[axum::debug_handler]
pub async fn get_group_members(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let group_id = parse_group_id(&group_id)?;
    let resolver = MembershipResolver::new(state.store.as_ref());

    let is_member = resolver.is_member(group_id, identity.id).await.map_err(|e| {
        tracing::error!(group_id = %group_id, error = %e, "Failed to check group membership");
        AppError::InternalServerError("Failed to get group members".into())
    })?;
    if !is_member {
        return Err(AppError::Forbidden(
            "You are not a member of this group".into(),
        ));
    }

    let roster = resolver.roster(group_id).await.map_err(|e| {
        tracing::error!(group_id = %group_id, error = %e, "Failed to get group members");
        AppError::InternalServerError("Failed to get group members".into())
    })?;

    let members = roster.into_iter().map(MemberInfo::from).collect();
    Ok((
        StatusCode::OK,
        success_to_api_response(GroupMembersResponse { members }),
    ))
}
