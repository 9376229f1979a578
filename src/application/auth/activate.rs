use crate::domain::users::{User, UserRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub struct ActivateUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl ActivateUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn execute(&self, token: Uuid) -> Result<User, AppError> {
        let user = self
            .users
            .activate(token)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                AppError::NotFound("invalid or already used activation token".to_string())
            })?;

        tracing::info!(user_id = user.id, "User activated");
        Ok(user)
    }
}
