use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 通知实体，每个 (接收者, 群组, 触发事件) 一条，只追加
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// 带群组名称的通知，用于通知列表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationWithGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub group_name: String,
}
