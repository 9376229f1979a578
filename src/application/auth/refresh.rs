use crate::application::auth::token_utils::{TokenResponse, hash_token, token_matches};
use crate::domain::auth::{AuthService, SessionRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct RefreshTokenUseCase {
    sessions: Arc<dyn SessionRepository>,
    auth_service: Arc<dyn AuthService>,
    rotate: bool,
}

impl RefreshTokenUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        auth_service: Arc<dyn AuthService>,
        rotate: bool,
    ) -> Self {
        Self {
            sessions,
            auth_service,
            rotate,
        }
    }

    /// Exchange the user's current refresh token for a new access token, and
    /// a new refresh token when rotation is on.
    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, presented: &str) -> Result<TokenResponse, AppError> {
        let claims = self
            .auth_service
            .decode_refresh_token(presented)
            .map_err(|e| {
                tracing::debug!("Refresh token rejected: {}", e);
                AppError::TokenExpiredOrInvalid
            })?;

        let session = self
            .sessions
            .find_by_user_id(claims.user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::Unauthorized("no active session".to_string()))?;

        if !token_matches(presented, &session.token_hash) {
            return Err(AppError::TokenExpiredOrInvalid);
        }

        let access_token = self
            .auth_service
            .generate_access_token(claims.user_id, claims.role_id)
            .map_err(AppError::InternalServerError)?;

        let refresh_token = if self.rotate {
            let token = self
                .auth_service
                .generate_refresh_token(claims.user_id, claims.role_id)
                .map_err(AppError::InternalServerError)?;
            let rotated = self
                .sessions
                .rotate(claims.user_id, &session.token_hash, &hash_token(&token))
                .await
                .map_err(AppError::InternalServerError)?;
            // Logged out or rotated by a concurrent refresh since the read
            if !rotated {
                return Err(AppError::TokenExpiredOrInvalid);
            }
            Some(token)
        } else {
            None
        };

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_service.access_token_expiry(),
        })
    }
}
