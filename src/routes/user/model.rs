use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePushTokenRequest {
    /// 空字符串或 null 表示清除
    #[serde(default)]
    pub push_token: Option<String>,
}

impl UpdatePushTokenRequest {
    pub fn normalized(&self) -> Option<&str> {
        self.push_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct PushTokenResponse {
    pub message: String,
}
