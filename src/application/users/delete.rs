use crate::domain::users::{UserId, UserRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct DeleteUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl DeleteUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Sessions and reset codes go with the account; orders are kept with
    /// their owner cleared.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: UserId) -> Result<(), AppError> {
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(AppError::InternalServerError)?;

        if !deleted {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
