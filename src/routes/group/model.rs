use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::group::GroupEntity;
use crate::database::models::user::UserEntity;

/// 群组名称最大字符数
pub const MAX_GROUP_NAME_LEN: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub group: GroupEntity,
}

#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<GroupEntity>,
}

#[derive(Debug, Serialize)]
pub struct JoinGroupResponse {
    pub message: String,
}

/// 对其他成员公开的用户信息，不包含邮箱和推送令牌
#[derive(Debug, Serialize)]
pub struct MemberInfo {
    pub id: Uuid,
    pub name: String,
}

impl From<UserEntity> for MemberInfo {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupMembersResponse {
    pub members: Vec<MemberInfo>,
}
