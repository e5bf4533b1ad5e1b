use serde::{Deserialize, Serialize};

use crate::database::models::notification::NotificationWithGroup;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// 按字符串接收，解析失败时用默认值而不是返回 400
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationWithGroup>,
}

/// 缺省、0、负数或无法解析时取默认值，超过上限时取上限
pub fn clamp_limit(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(limit) if limit > MAX_LIMIT => MAX_LIMIT,
        Some(limit) if limit > 0 => limit,
        _ => DEFAULT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(clamp_limit(None), 50);
        assert_eq!(clamp_limit(Some("0")), 50);
        assert_eq!(clamp_limit(Some("-3")), 50);
        assert_eq!(clamp_limit(Some("abc")), 50);
        assert_eq!(clamp_limit(Some("20")), 20);
        assert_eq!(clamp_limit(Some("100")), 100);
        assert_eq!(clamp_limit(Some("500")), 100);
    }
}
