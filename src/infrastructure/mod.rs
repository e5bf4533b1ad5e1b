// 外部协作方：身份校验和推送分发

pub mod auth;
pub mod push;

pub use auth::{AuthError, Identity, IdentityVerifier, JwtVerifier};
pub use push::{DeliveryOutcome, ExpoPushSender, LogPushSender, PushSender};
