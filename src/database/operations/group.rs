// 群组存储库
// 包含群组和群组成员相关的数据库操作

use crate::database::models::group::GroupEntity;
use crate::database::models::user::UserEntity;
use sqlx::{Error as SqlxError, PgPool};
use std::sync::Arc;
use uuid::Uuid;

/// 群组存储库，处理所有与群组相关的数据库操作
pub struct GroupOperation {
    db: Arc<PgPool>,
}

impl GroupOperation {
    /// 创建新的群组存储库实例
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }

    /// 创建群组，只写 groups 表，创建者入群由调用方单独完成
    pub async fn create(&self, name: &str, created_by: Uuid) -> Result<GroupEntity, SqlxError> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, created_by)
            VALUES ($1, $2)
            RETURNING id, name, created_by, created_at
            "#,
        )
        .bind(name)
        .bind(created_by)
        .fetch_one(&*self.db)
        .await
    }

    /// 根据ID查找群组
    pub async fn find_by_id(&self, group_id: Uuid) -> Result<Option<GroupEntity>, SqlxError> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, created_by, created_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&*self.db)
        .await
    }

    /// 用户加入的所有群组，按创建时间倒序
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<GroupEntity>, SqlxError> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT g.id, g.name, g.created_by, g.created_at
            FROM groups g
            INNER JOIN group_members gm ON g.id = gm.group_id
            WHERE gm.user_id = $1
            ORDER BY g.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await
    }

    /// 加入群组，重复加入不报错
    pub async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&*self.db)
        .await?;

        Ok(())
    }

    /// 群组成员列表，不保证顺序
    pub async fn members(&self, group_id: Uuid) -> Result<Vec<UserEntity>, SqlxError> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT u.id, u.email, u.name, u.push_token, u.created_at
            FROM users u
            INNER JOIN group_members gm ON u.id = gm.user_id
            WHERE gm.group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_all(&*self.db)
        .await
    }

    /// 检查用户是否在群组中
    pub async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, SqlxError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM group_members
                WHERE group_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&*self.db)
        .await
    }

    /// 补回创建群组时没写成功的创建者成员关系
    pub async fn restore_creator_memberships(&self) -> Result<u64, SqlxError> {
        let result = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id)
            SELECT g.id, g.created_by
            FROM groups g
            WHERE NOT EXISTS (
                SELECT 1 FROM group_members gm
                WHERE gm.group_id = g.id AND gm.user_id = g.created_by
            )
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .execute(&*self.db)
        .await?;

        Ok(result.rows_affected())
    }
}
