// 持久化网关
// 扇出流程和路由只依赖这个 trait，生产环境由 PgStore 实现

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::group::GroupEntity;
use crate::database::models::location::{CountryCode, LocationEntity, LocationStatus};
use crate::database::models::notification::{NotificationEntity, NotificationWithGroup};
use crate::database::models::user::UserEntity;
use crate::database::operations::{
    GroupOperation, LocationOperation, NotificationOperation, UserOperation,
};
use crate::error::StoreError;

#[async_trait]
pub trait Store: Send + Sync {
    async fn health(&self) -> Result<(), StoreError>;

    async fn upsert_user(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
    ) -> Result<UserEntity, StoreError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserEntity>, StoreError>;
    async fn update_push_token(
        &self,
        user_id: Uuid,
        push_token: Option<&str>,
    ) -> Result<bool, StoreError>;

    async fn create_group(&self, name: &str, created_by: Uuid) -> Result<GroupEntity, StoreError>;
    async fn get_group(&self, group_id: Uuid) -> Result<Option<GroupEntity>, StoreError>;
    /// 按创建时间倒序
    async fn list_user_groups(&self, user_id: Uuid) -> Result<Vec<GroupEntity>, StoreError>;
    /// 插入成员关系，冲突时忽略
    async fn add_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
    async fn get_group_members(&self, group_id: Uuid) -> Result<Vec<UserEntity>, StoreError>;
    async fn is_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    async fn restore_creator_memberships(&self) -> Result<u64, StoreError>;

    async fn create_location(
        &self,
        user_id: Uuid,
        country_code: &CountryCode,
        status: LocationStatus,
    ) -> Result<LocationEntity, StoreError>;
    async fn latest_location(&self, user_id: Uuid) -> Result<Option<LocationEntity>, StoreError>;

    async fn create_notification(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        message: &str,
    ) -> Result<NotificationEntity, StoreError>;
    /// 最新的在前
    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationWithGroup>, StoreError>;
}

/// 基于 Postgres 连接池的网关
pub struct PgStore {
    pool: Arc<PgPool>,
    users: UserOperation,
    groups: GroupOperation,
    locations: LocationOperation,
    notifications: NotificationOperation,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            users: UserOperation::new(pool.clone()),
            groups: GroupOperation::new(pool.clone()),
            locations: LocationOperation::new(pool.clone()),
            notifications: NotificationOperation::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    async fn upsert_user(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
    ) -> Result<UserEntity, StoreError> {
        Ok(self.users.upsert(user_id, email, name).await?)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserEntity>, StoreError> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    async fn update_push_token(
        &self,
        user_id: Uuid,
        push_token: Option<&str>,
    ) -> Result<bool, StoreError> {
        Ok(self.users.update_push_token(user_id, push_token).await?)
    }

    async fn create_group(&self, name: &str, created_by: Uuid) -> Result<GroupEntity, StoreError> {
        Ok(self.groups.create(name, created_by).await?)
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<GroupEntity>, StoreError> {
        Ok(self.groups.find_by_id(group_id).await?)
    }

    async fn list_user_groups(&self, user_id: Uuid) -> Result<Vec<GroupEntity>, StoreError> {
        Ok(self.groups.list_by_user(user_id).await?)
    }

    async fn add_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        Ok(self.groups.add_member(group_id, user_id).await?)
    }

    async fn get_group_members(&self, group_id: Uuid) -> Result<Vec<UserEntity>, StoreError> {
        Ok(self.groups.members(group_id).await?)
    }

    async fn is_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.groups.is_member(group_id, user_id).await?)
    }

    async fn restore_creator_memberships(&self) -> Result<u64, StoreError> {
        Ok(self.groups.restore_creator_memberships().await?)
    }

    async fn create_location(
        &self,
        user_id: Uuid,
        country_code: &CountryCode,
        status: LocationStatus,
    ) -> Result<LocationEntity, StoreError> {
        let row = self.locations.create(user_id, country_code, status).await?;
        Ok(LocationEntity::try_from(row)?)
    }

    async fn latest_location(&self, user_id: Uuid) -> Result<Option<LocationEntity>, StoreError> {
        match self.locations.latest(user_id).await? {
            Some(row) => Ok(Some(LocationEntity::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn create_notification(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        message: &str,
    ) -> Result<NotificationEntity, StoreError> {
        Ok(self.notifications.create(user_id, group_id, message).await?)
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationWithGroup>, StoreError> {
        Ok(self.notifications.list_by_user(user_id, limit).await?)
    }
}
