use crate::domain::users::{RoleId, UserId};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Claims carried by both access and refresh tokens.
///
/// The two token kinds share a shape and are told apart only by the secret
/// that signed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub role_id: RoleId,
    /// Expiration timestamp (unix seconds)
    pub exp: i64,
    /// Unique per token, so two tokens minted in the same second still differ.
    /// Tokens carrying only `user_id`, `role_id` and `exp` are still accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
}

impl Claims {
    pub fn new(user_id: UserId, role_id: RoleId, expiry_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            user_id,
            role_id,
            exp: now + expiry_seconds,
            jti: Some(Uuid::new_v4()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed: {0}")]
    Malformed(String),
}

/// Persisted refresh-token binding; one per user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub token_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert the user's session or overwrite its token, atomically.
    async fn save(&self, user_id: UserId, token_hash: &str) -> Result<Session>;

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Session>>;

    /// Replace the token only if the stored one is still `current_hash`.
    /// `false` when the session was revoked or already rotated; never inserts.
    async fn rotate(&self, user_id: UserId, current_hash: &str, new_hash: &str) -> Result<bool>;

    /// Delete the session holding this token hash. `false` when nothing matched.
    async fn remove(&self, token_hash: &str) -> Result<bool>;

    async fn remove_for_user(&self, user_id: UserId) -> Result<bool>;
}

/// Token minting and verification, one secret per token kind.
pub trait AuthService: Send + Sync {
    fn generate_access_token(&self, user_id: UserId, role_id: RoleId) -> Result<String>;

    fn generate_refresh_token(&self, user_id: UserId, role_id: RoleId) -> Result<String>;

    fn decode_access_token(&self, token: &str) -> Result<Claims, TokenError>;

    fn decode_refresh_token(&self, token: &str) -> Result<Claims, TokenError>;

    /// Access token lifetime in seconds.
    fn access_token_expiry(&self) -> i64;

    /// Refresh token lifetime in seconds.
    fn refresh_token_expiry(&self) -> i64;
}
