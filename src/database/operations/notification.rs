// 通知存储库

use crate::database::models::notification::{NotificationEntity, NotificationWithGroup};
use sqlx::{Error as SqlxError, PgPool};
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationOperation {
    db: Arc<PgPool>,
}

impl NotificationOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        message: &str,
    ) -> Result<NotificationEntity, SqlxError> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (user_id, group_id, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, group_id, message, created_at
            "#,
        )
        .bind(user_id)
        .bind(group_id)
        .bind(message)
        .fetch_one(&*self.db)
        .await
    }

    /// 用户的通知，最新的在前，同一时间按插入顺序倒序
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationWithGroup>, SqlxError> {
        sqlx::query_as::<_, NotificationWithGroup>(
            r#"
            SELECT n.id, n.user_id, n.group_id, n.message, n.created_at, g.name AS group_name
            FROM notifications n
            INNER JOIN groups g ON n.group_id = g.id
            WHERE n.user_id = $1
            ORDER BY n.created_at DESC, n.seq DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&*self.db)
        .await
    }
}
