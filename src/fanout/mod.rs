// 位置更新扇出
//
// 记录事件 -> 查群组 -> 每个群组查成员、拼消息 -> 每个成员写通知、推送
// 事件写入失败直接返回错误；之后的任何失败只影响所在的分支

pub mod membership;
pub mod report;

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::group::GroupEntity;
use crate::database::models::location::{CountryCode, LocationStatus};
use crate::error::StoreError;
use crate::infrastructure::auth::Identity;
use crate::infrastructure::push::{DeliveryOutcome, PushSender};

pub use membership::MembershipResolver;
pub use report::{BranchFailure, FanOutReport, GroupOutcome, Propagation};

#[derive(Debug, Error)]
pub enum FanOutError {
    /// 事件没有写入，不会发出任何通知
    #[error("failed to record location event: {0}")]
    Record(#[source] StoreError),
}

/// 通知文案
pub fn compose_message(reporter_name: &str, country_code: &CountryCode, status: LocationStatus) -> String {
    match status {
        LocationStatus::Arrived => format!("{reporter_name} has arrived in {country_code}"),
        LocationStatus::Left => format!("{reporter_name} has left {country_code}"),
    }
}

pub struct FanOut {
    store: Arc<dyn Store>,
    push: Arc<dyn PushSender>,
    /// 同时处理的群组数
    concurrency: usize,
}

impl FanOut {
    pub fn new(store: Arc<dyn Store>, push: Arc<dyn PushSender>, concurrency: usize) -> Self {
        Self {
            store,
            push,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn report_location(
        &self,
        reporter: &Identity,
        country_code: CountryCode,
        status: LocationStatus,
    ) -> Result<FanOutReport, FanOutError> {
        let location = self
            .store
            .create_location(reporter.id, &country_code, status)
            .await
            .map_err(FanOutError::Record)?;

        let groups = match MembershipResolver::new(self.store.as_ref())
            .groups_for(reporter.id)
            .await
        {
            Ok(groups) => groups,
            Err(err) => {
                tracing::error!(
                    user_id = %reporter.id,
                    error = %err,
                    "Failed to list user groups, location recorded but not propagated"
                );
                return Ok(FanOutReport::skipped(location, err.to_string()));
            }
        };

        let branch = Branch {
            store: self.store.clone(),
            push: self.push.clone(),
            reporter_id: reporter.id,
            message: compose_message(&reporter.name, &country_code, status).into(),
        };
        let branches: Vec<_> = groups
            .into_iter()
            .map(|group| branch.clone().notify_group(group))
            .collect();

        // 分支在独立任务里执行，请求被丢弃也会全部跑完
        // buffered 保持群组顺序，分支之间互不取消
        let concurrency = self.concurrency;
        let reporter_id = reporter.id;
        let stage = tokio::spawn(async move {
            let outcomes: Vec<GroupOutcome> = stream::iter(branches)
                .buffered(concurrency)
                .collect()
                .await;
            tracing::info!(
                user_id = %reporter_id,
                groups = outcomes.len(),
                notifications = outcomes.iter().map(|o| o.notified).sum::<usize>(),
                pushes = outcomes.iter().map(|o| o.pushed).sum::<usize>(),
                failures = outcomes.iter().map(|o| o.failures.len()).sum::<usize>(),
                "Location update propagated"
            );
            outcomes
        });

        match stage.await {
            Ok(outcomes) => Ok(FanOutReport::from_groups(location, outcomes)),
            Err(err) => {
                tracing::error!(user_id = %reporter.id, error = %err, "Fan-out task failed");
                Ok(FanOutReport::interrupted(location, err.to_string()))
            }
        }
    }
}

/// 单个群组分支需要的全部数据，分支 future 不借用调用方
#[derive(Clone)]
struct Branch {
    store: Arc<dyn Store>,
    push: Arc<dyn PushSender>,
    reporter_id: Uuid,
    message: Arc<str>,
}

impl Branch {
    async fn notify_group(self, group: GroupEntity) -> GroupOutcome {
        let mut outcome = GroupOutcome::new(group.id);

        let roster = match MembershipResolver::new(self.store.as_ref())
            .roster(group.id)
            .await
        {
            Ok(roster) => roster,
            Err(err) => {
                tracing::error!(group_id = %group.id, error = %err, "Failed to get group members");
                outcome.failures.push(BranchFailure::Roster {
                    group_id: group.id,
                    reason: err.to_string(),
                });
                return outcome;
            }
        };

        let mut seen: HashSet<Uuid> = HashSet::new();
        for member in roster.iter().filter(|m| m.id != self.reporter_id) {
            if !seen.insert(member.id) {
                continue;
            }

            if let Err(err) = self
                .store
                .create_notification(member.id, group.id, &self.message)
                .await
            {
                tracing::error!(
                    group_id = %group.id,
                    member_id = %member.id,
                    error = %err,
                    "Failed to create notification"
                );
                outcome.failures.push(BranchFailure::Notification {
                    group_id: group.id,
                    recipient_id: member.id,
                    reason: err.to_string(),
                });
                continue;
            }
            outcome.notified += 1;

            let Some(push_token) = member.push_token() else {
                continue;
            };
            match self.push.send(push_token, &self.message).await {
                DeliveryOutcome::Sent => outcome.pushed += 1,
                DeliveryOutcome::Failed(reason) => {
                    tracing::warn!(
                        group_id = %group.id,
                        member_id = %member.id,
                        reason = %reason,
                        "Failed to send push notification"
                    );
                    outcome.failures.push(BranchFailure::Delivery {
                        group_id: group.id,
                        recipient_id: member.id,
                        reason,
                    });
                }
            }
        }

        outcome
    }
}
