use crate::application::auth::token_utils::{hash_token, token_matches};
use crate::domain::auth::SessionRepository;
use crate::domain::users::UserId;
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct LogoutUseCase {
    sessions: Arc<dyn SessionRepository>,
}

impl LogoutUseCase {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Revoke the session, but only with the refresh token it was issued
    /// with: a stale client must not end a newer session.
    #[tracing::instrument(skip(self, presented))]
    pub async fn execute(&self, user_id: UserId, presented: Option<&str>) -> Result<(), AppError> {
        let session = self
            .sessions
            .find_by_user_id(user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::Unauthorized("no active session".to_string()))?;

        let presented = presented
            .ok_or_else(|| AppError::Unauthorized("refresh token not presented".to_string()))?;

        if !token_matches(presented, &session.token_hash) {
            return Err(AppError::Unauthorized(
                "refresh token does not match the active session".to_string(),
            ));
        }

        let removed = self
            .sessions
            .remove(&hash_token(presented))
            .await
            .map_err(AppError::InternalServerError)?;

        if !removed {
            return Err(AppError::Unauthorized("no active session".to_string()));
        }

        tracing::info!(user_id, "User logged out");
        Ok(())
    }
}
