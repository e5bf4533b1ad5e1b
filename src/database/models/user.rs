use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 用户数据库实体
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// 设备推送令牌，与位置更新无关，可单独修改
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserEntity {
    /// 已注册且非空的推送令牌
    pub fn push_token(&self) -> Option<&str> {
        self.push_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(push_token: Option<&str>) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            email: "bob@example.com".to_string(),
            name: "Bob".to_string(),
            push_token: push_token.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn blank_push_token_counts_as_unregistered() {
        assert_eq!(user(None).push_token(), None);
        assert_eq!(user(Some("")).push_token(), None);
        assert_eq!(user(Some("   ")).push_token(), None);
        assert_eq!(
            user(Some("ExponentPushToken[abc]")).push_token(),
            Some("ExponentPushToken[abc]")
        );
    }
}
