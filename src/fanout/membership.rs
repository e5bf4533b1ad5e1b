// 成员关系解析
// 每次扇出都重新查询，不做缓存

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::database::Store;
use crate::database::models::group::GroupEntity;
use crate::database::models::user::UserEntity;
use crate::error::StoreError;

pub struct MembershipResolver<'a> {
    store: &'a dyn Store,
}

impl<'a> MembershipResolver<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// 用户所在的群组，按创建时间倒序
    pub async fn groups_for(&self, user_id: Uuid) -> Result<Vec<GroupEntity>, StoreError> {
        self.store.list_user_groups(user_id).await
    }

    /// 群组当前的成员
    pub async fn roster(&self, group_id: Uuid) -> Result<Vec<UserEntity>, StoreError> {
        self.store.get_group_members(group_id).await
    }

    pub async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        self.store.is_group_member(group_id, user_id).await
    }
}

/// 建群后写创建者成员关系失败时不会让请求失败，这里定期补回
pub async fn reconcile_creator_memberships(store: Arc<dyn Store>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match store.restore_creator_memberships().await {
            Ok(0) => tracing::debug!("No missing creator memberships"),
            Ok(restored) => tracing::warn!(restored, "Restored missing creator memberships"),
            Err(err) => tracing::error!(error = %err, "Failed to restore creator memberships"),
        }
    }
}
