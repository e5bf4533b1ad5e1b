// 用户存储库
// 包含用户相关的数据库操作

use crate::database::models::user::UserEntity;
use sqlx::{Error as SqlxError, PgPool};
use std::sync::Arc;
use uuid::Uuid;

/// 用户存储库，处理所有与用户相关的数据库操作
pub struct UserOperation {
    db: Arc<PgPool>,
}

impl UserOperation {
    /// 创建新的用户存储库实例
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }

    /// 写入认证用户，已存在时刷新邮箱和名称，不会覆盖推送令牌
    pub async fn upsert(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
    ) -> Result<UserEntity, SqlxError> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
                SET email = EXCLUDED.email, name = EXCLUDED.name
            RETURNING id, email, name, push_token, created_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(name)
        .fetch_one(&*self.db)
        .await
    }

    /// 根据ID查找用户
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>, SqlxError> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, name, push_token, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await
    }

    /// 设置或清除推送令牌，返回用户是否存在
    pub async fn update_push_token(
        &self,
        user_id: Uuid,
        push_token: Option<&str>,
    ) -> Result<bool, SqlxError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET push_token = $1
            WHERE id = $2
            "#,
        )
        .bind(push_token)
        .bind(user_id)
        .execute(&*self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
