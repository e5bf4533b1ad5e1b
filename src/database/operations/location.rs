// 位置事件存储库

use crate::database::models::location::{CountryCode, LocationRow, LocationStatus};
use sqlx::{Error as SqlxError, PgPool};
use std::sync::Arc;
use uuid::Uuid;

pub struct LocationOperation {
    db: Arc<PgPool>,
}

impl LocationOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }

    /// 追加一条位置事件
    pub async fn create(
        &self,
        user_id: Uuid,
        country_code: &CountryCode,
        status: LocationStatus,
    ) -> Result<LocationRow, SqlxError> {
        sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO user_locations (user_id, country_code, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, country_code, status, updated_at
            "#,
        )
        .bind(user_id)
        .bind(country_code.as_str())
        .bind(status.as_str())
        .fetch_one(&*self.db)
        .await
    }

    /// 用户当前位置：时间倒序，同一时间按插入顺序倒序
    pub async fn latest(&self, user_id: Uuid) -> Result<Option<LocationRow>, SqlxError> {
        sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, user_id, country_code, status, updated_at
            FROM user_locations
            WHERE user_id = $1
            ORDER BY updated_at DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await
    }
}
