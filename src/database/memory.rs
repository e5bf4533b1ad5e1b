// 测试用的内存网关，可以按操作注入故障

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use crate::database::models::group::GroupEntity;
use crate::database::models::location::{CountryCode, LocationEntity, LocationStatus};
use crate::database::models::notification::{NotificationEntity, NotificationWithGroup};
use crate::database::models::user::UserEntity;
use crate::database::store::Store;
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    Health,
    UpsertUser,
    CreateGroup,
    AddMember,
    CreateLocation,
    ListUserGroups,
    /// 某个群组的成员查询失败
    GroupMembers(Uuid),
    /// 写给某个接收者的通知失败
    CreateNotification(Uuid),
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserEntity>,
    groups: Vec<GroupEntity>,
    members: Vec<(Uuid, Uuid)>,
    locations: Vec<LocationEntity>,
    notifications: Vec<NotificationEntity>,
    faults: HashSet<Fault>,
}

impl State {
    fn check(&self, fault: Fault) -> Result<(), StoreError> {
        if self.faults.contains(&fault) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }

    fn is_member(&self, group_id: Uuid, user_id: Uuid) -> bool {
        self.members.contains(&(group_id, user_id))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(&self, fault: Fault) {
        self.state.lock().unwrap().faults.insert(fault);
    }

    pub fn add_user(&self, name: &str, push_token: Option<&str>) -> UserEntity {
        let user = UserEntity {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            push_token: push_token.map(str::to_string),
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().users.insert(user.id, user.clone());
        user
    }

    /// 建群并让所有成员入群，第一个是创建者
    pub fn add_group(&self, name: &str, members: &[&UserEntity]) -> GroupEntity {
        let mut state = self.state.lock().unwrap();
        let group = GroupEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_by: members.first().map(|u| u.id).unwrap_or_else(Uuid::new_v4),
            created_at: Utc::now(),
        };
        state.groups.push(group.clone());
        for member in members {
            state.members.push((group.id, member.id));
        }
        group
    }

    pub fn notifications(&self) -> Vec<NotificationEntity> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn locations(&self) -> Vec<LocationEntity> {
        self.state.lock().unwrap().locations.clone()
    }

    pub fn membership_rows(&self, group_id: Uuid, user_id: Uuid) -> usize {
        self.state
            .lock()
            .unwrap()
            .members
            .iter()
            .filter(|row| **row == (group_id, user_id))
            .count()
    }

    pub fn push_token_of(&self, user_id: Uuid) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(&user_id)
            .and_then(|u| u.push_token.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health(&self) -> Result<(), StoreError> {
        self.state.lock().unwrap().check(Fault::Health)
    }

    async fn upsert_user(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
    ) -> Result<UserEntity, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.check(Fault::UpsertUser)?;
        let user = state.users.entry(user_id).or_insert_with(|| UserEntity {
            id: user_id,
            email: email.to_string(),
            name: name.to_string(),
            push_token: None,
            created_at: Utc::now(),
        });
        user.email = email.to_string();
        user.name = name.to_string();
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserEntity>, StoreError> {
        Ok(self.state.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn update_push_token(
        &self,
        user_id: Uuid,
        push_token: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.users.get_mut(&user_id) {
            Some(user) => {
                user.push_token = push_token.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_group(&self, name: &str, created_by: Uuid) -> Result<GroupEntity, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.check(Fault::CreateGroup)?;
        let group = GroupEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_by,
            created_at: Utc::now(),
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<GroupEntity>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn list_user_groups(&self, user_id: Uuid) -> Result<Vec<GroupEntity>, StoreError> {
        let state = self.state.lock().unwrap();
        state.check(Fault::ListUserGroups)?;
        Ok(state
            .groups
            .iter()
            .rev()
            .filter(|g| state.is_member(g.id, user_id))
            .cloned()
            .collect())
    }

    async fn add_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.check(Fault::AddMember)?;
        if !state.is_member(group_id, user_id) {
            state.members.push((group_id, user_id));
        }
        Ok(())
    }

    async fn get_group_members(&self, group_id: Uuid) -> Result<Vec<UserEntity>, StoreError> {
        let state = self.state.lock().unwrap();
        state.check(Fault::GroupMembers(group_id))?;
        Ok(state
            .members
            .iter()
            .filter(|(g, _)| *g == group_id)
            .filter_map(|(_, u)| state.users.get(u).cloned())
            .collect())
    }

    async fn is_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.lock().unwrap().is_member(group_id, user_id))
    }

    async fn restore_creator_memberships(&self) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let missing: Vec<(Uuid, Uuid)> = state
            .groups
            .iter()
            .map(|g| (g.id, g.created_by))
            .filter(|(g, u)| !state.is_member(*g, *u))
            .collect();
        let restored = missing.len() as u64;
        state.members.extend(missing);
        Ok(restored)
    }

    async fn create_location(
        &self,
        user_id: Uuid,
        country_code: &CountryCode,
        status: LocationStatus,
    ) -> Result<LocationEntity, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.check(Fault::CreateLocation)?;
        let location = LocationEntity {
            id: Uuid::new_v4(),
            user_id,
            country_code: country_code.clone(),
            status,
            updated_at: Utc::now(),
        };
        state.locations.push(location.clone());
        Ok(location)
    }

    async fn latest_location(&self, user_id: Uuid) -> Result<Option<LocationEntity>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .locations
            .iter()
            .rev()
            .find(|l| l.user_id == user_id)
            .cloned())
    }

    async fn create_notification(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        message: &str,
    ) -> Result<NotificationEntity, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.check(Fault::CreateNotification(user_id))?;
        let notification = NotificationEntity {
            id: Uuid::new_v4(),
            user_id,
            group_id,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationWithGroup>, StoreError> {
        let state = self.state.lock().unwrap();
        let group_names: HashMap<Uuid, &str> = state
            .groups
            .iter()
            .map(|g| (g.id, g.name.as_str()))
            .collect();
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .take(limit.max(0) as usize)
            .map(|n| NotificationWithGroup {
                id: n.id,
                user_id: n.user_id,
                group_id: n.group_id,
                message: n.message.clone(),
                created_at: n.created_at,
                group_name: group_names.get(&n.group_id).unwrap_or(&"").to_string(),
            })
            .collect())
    }
}
