use crate::domain::auth::{AuthService, SessionRepository};
use crate::domain::users::{RoleId, UserId};
use crate::shared::error::AppError;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Tokens handed to the client after login or refresh.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Absent when a refresh did not rotate the refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// SHA-256 hex digest; sessions store this instead of the token itself.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn token_matches(presented: &str, stored_hash: &str) -> bool {
    hash_token(presented) == stored_hash
}

/// 6 random bytes, hex encoded.
pub fn generate_reset_code() -> String {
    let mut bytes = [0u8; 6];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Mint an access/refresh pair and make the refresh token the user's only
/// live session.
pub async fn issue_token_pair(
    user_id: UserId,
    role_id: RoleId,
    auth_service: &Arc<dyn AuthService>,
    sessions: &Arc<dyn SessionRepository>,
) -> Result<TokenResponse, AppError> {
    let access_token = auth_service
        .generate_access_token(user_id, role_id)
        .map_err(AppError::InternalServerError)?;

    let refresh_token = auth_service
        .generate_refresh_token(user_id, role_id)
        .map_err(AppError::InternalServerError)?;

    sessions
        .save(user_id, &hash_token(&refresh_token))
        .await
        .map_err(AppError::InternalServerError)?;

    Ok(TokenResponse {
        access_token,
        refresh_token: Some(refresh_token),
        token_type: "Bearer".to_string(),
        expires_in: auth_service.access_token_expiry(),
    })
}
