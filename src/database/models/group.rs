// 群组实体
// 定义群组相关的数据库实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 群组实体，创建后只有成员关系会变化
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupEntity {
    /// 群组ID
    pub id: Uuid,
    /// 群组名称
    pub name: String,
    /// 创建者ID
    pub created_by: Uuid,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}
