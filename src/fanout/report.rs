use std::fmt;

use uuid::Uuid;

use crate::database::models::location::LocationEntity;

/// 扇出结果的粗粒度提示，调用方只能看到这个
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// 所有分支都成功
    Complete,
    /// 事件已记录，部分成员列表、通知写入或推送失败
    Partial,
    /// 事件已记录，但群组查询失败，没有任何扇出
    Skipped,
}

impl Propagation {
    pub fn message(&self) -> &'static str {
        match self {
            Propagation::Complete => "Location updated and notifications sent",
            Propagation::Partial => "Location updated, some notifications could not be delivered",
            Propagation::Skipped => "Location recorded but not propagated",
        }
    }
}

/// 单个分支的失败，只用于服务端诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchFailure {
    Groups {
        reason: String,
    },
    /// 分支任务异常退出，结果无法收集
    Stage {
        reason: String,
    },
    Roster {
        group_id: Uuid,
        reason: String,
    },
    Notification {
        group_id: Uuid,
        recipient_id: Uuid,
        reason: String,
    },
    Delivery {
        group_id: Uuid,
        recipient_id: Uuid,
        reason: String,
    },
}

impl fmt::Display for BranchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchFailure::Groups { reason } => write!(f, "groups lookup failed: {reason}"),
            BranchFailure::Stage { reason } => write!(f, "fan-out task failed: {reason}"),
            BranchFailure::Roster { group_id, reason } => {
                write!(f, "roster of group {group_id} failed: {reason}")
            }
            BranchFailure::Notification {
                group_id,
                recipient_id,
                reason,
            } => write!(
                f,
                "notification for {recipient_id} in group {group_id} failed: {reason}"
            ),
            BranchFailure::Delivery {
                group_id,
                recipient_id,
                reason,
            } => write!(
                f,
                "push to {recipient_id} in group {group_id} failed: {reason}"
            ),
        }
    }
}

/// 单个群组分支的结果
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    pub group_id: Uuid,
    pub notified: usize,
    pub pushed: usize,
    pub failures: Vec<BranchFailure>,
}

impl GroupOutcome {
    pub fn new(group_id: Uuid) -> Self {
        Self {
            group_id,
            notified: 0,
            pushed: 0,
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FanOutReport {
    pub location: LocationEntity,
    pub propagation: Propagation,
    pub groups: usize,
    pub notifications_created: usize,
    pub pushes_sent: usize,
    pub failures: Vec<BranchFailure>,
}

impl FanOutReport {
    pub fn skipped(location: LocationEntity, reason: String) -> Self {
        Self {
            location,
            propagation: Propagation::Skipped,
            groups: 0,
            notifications_created: 0,
            pushes_sent: 0,
            failures: vec![BranchFailure::Groups { reason }],
        }
    }

    pub fn interrupted(location: LocationEntity, reason: String) -> Self {
        Self {
            location,
            propagation: Propagation::Partial,
            groups: 0,
            notifications_created: 0,
            pushes_sent: 0,
            failures: vec![BranchFailure::Stage { reason }],
        }
    }

    pub fn from_groups(location: LocationEntity, outcomes: Vec<GroupOutcome>) -> Self {
        let groups = outcomes.len();
        let notifications_created = outcomes.iter().map(|o| o.notified).sum();
        let pushes_sent = outcomes.iter().map(|o| o.pushed).sum();
        let failures: Vec<BranchFailure> = outcomes.into_iter().flat_map(|o| o.failures).collect();
        let propagation = if failures.is_empty() {
            Propagation::Complete
        } else {
            Propagation::Partial
        };

        Self {
            location,
            propagation,
            groups,
            notifications_created,
            pushes_sent,
            failures,
        }
    }
}
