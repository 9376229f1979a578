use crate::domain::auth::SessionRepository;
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{
    DuplicateEmailError, EditConflictError, UpdateUser, User, UserId, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::validation::validate_password;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub lastname: Option<String>,
    #[validate(length(max = 32, message = "must not be more than 32 characters"))]
    pub phone_number: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_password"))]
    pub password: Option<String>,
}

pub struct UpdateUserUseCase {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl UpdateUserUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        password_service: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            users,
            sessions,
            password_service,
        }
    }

    /// Users may only edit their own record. A password change ends the
    /// current session.
    #[tracing::instrument(skip(self, req))]
    pub async fn execute(
        &self,
        actor_id: UserId,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<User, AppError> {
        if actor_id != id {
            return Err(AppError::Forbidden(
                "you can only update your own account".to_string(),
            ));
        }

        let password_hash = req
            .password
            .as_deref()
            .map(|password| self.password_service.hash_password(password))
            .transpose()
            .map_err(AppError::InternalServerError)?;
        let password_changed = password_hash.is_some();

        let update = UpdateUser {
            firstname: req.firstname,
            lastname: req.lastname,
            phone_number: req.phone_number,
            email: req.email,
            password_hash,
        };

        if update.is_empty() {
            return self
                .users
                .find_by_id(id)
                .await
                .map_err(AppError::InternalServerError)?
                .ok_or(AppError::EditConflict);
        }

        let user = self.users.update(id, update).await.map_err(|e| {
            if e.is::<DuplicateEmailError>() {
                AppError::DuplicateEmail
            } else if e.is::<EditConflictError>() {
                AppError::EditConflict
            } else {
                AppError::InternalServerError(e)
            }
        })?;

        if password_changed {
            self.sessions
                .remove_for_user(id)
                .await
                .map_err(AppError::InternalServerError)?;
        }

        Ok(user)
    }
}
