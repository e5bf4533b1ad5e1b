// 推送分发
// 尽力而为：只尝试一次，结果只有成功或失败原因，不会向上抛错

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, push_token: &str, message: &str) -> DeliveryOutcome;
}

/// 未开启推送时使用，只打日志
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send(&self, push_token: &str, message: &str) -> DeliveryOutcome {
        tracing::info!(message, "Push delivery disabled, logging notification only");
        tracing::debug!(push_token, "Skipped push delivery");
        DeliveryOutcome::Sent
    }
}

/// Expo 推送接口的单条回执
#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: ExpoTicket,
}

pub struct ExpoPushSender {
    client: reqwest::Client,
    url: String,
    access_token: Option<String>,
}

impl ExpoPushSender {
    pub fn new(
        url: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            access_token,
        })
    }

    async fn try_send(&self, push_token: &str, message: &str) -> Result<(), String> {
        let payload = json!({
            "to": push_token,
            "sound": "default",
            "body": message,
            "data": { "type": "location_update" },
        });

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(access_token) = &self.access_token {
            request = request.bearer_auth(access_token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("failed to send push notification: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("push service responded with {status}: {body}"));
        }

        let ticket = response
            .json::<ExpoResponse>()
            .await
            .map_err(|e| format!("unreadable push service response: {e}"))?
            .data;

        if ticket.status == "ok" {
            Ok(())
        } else {
            Err(ticket
                .message
                .unwrap_or_else(|| format!("push ticket status {}", ticket.status)))
        }
    }
}

#[async_trait]
impl PushSender for ExpoPushSender {
    async fn send(&self, push_token: &str, message: &str) -> DeliveryOutcome {
        match self.try_send(push_token, message).await {
            Ok(()) => {
                tracing::debug!(push_token, "Push notification sent");
                DeliveryOutcome::Sent
            }
            Err(reason) => DeliveryOutcome::Failed(reason),
        }
    }
}
