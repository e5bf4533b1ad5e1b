// 身份校验
// 核心流程只依赖 IdentityVerifier，生产环境校验 Supabase 签发的 HS256 JWT

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 已认证的调用者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token subject is not a valid user id: {0}")]
    InvalidSubject(String),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    name: Option<String>,
    full_name: Option<String>,
}

impl Claims {
    fn into_identity(self) -> Result<Identity, AuthError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSubject(self.sub.clone()))?;
        let email = self.email.unwrap_or_default();
        let name = self
            .user_metadata
            .name
            .or(self.user_metadata.full_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| email.split('@').next().filter(|s| !s.is_empty()).map(str::to_string))
            .unwrap_or_else(|| "Someone".to_string());

        Ok(Identity { id, email, name })
    }
}

/// 用共享密钥校验 JWT
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation)?;
        let identity = token_data.claims.into_identity()?;
        tracing::debug!(user_id = %identity.id, "User authenticated");
        Ok(identity)
    }
}
