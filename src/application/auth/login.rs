use crate::application::auth::token_utils::{TokenResponse, issue_token_pair};
use crate::domain::auth::{AuthService, SessionRepository};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "must be provided"))]
    pub password: String,
}

pub struct LoginUseCase {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    auth_service: Arc<dyn AuthService>,
    password_service: Arc<dyn PasswordHashingService>,
    require_activation: bool,
}

impl LoginUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        auth_service: Arc<dyn AuthService>,
        password_service: Arc<dyn PasswordHashingService>,
        require_activation: bool,
    ) -> Self {
        Self {
            users,
            sessions,
            auth_service,
            password_service,
            require_activation,
        }
    }

    /// Unknown email and wrong password fail identically.
    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or(AppError::InvalidCredentials)?;

        let valid_password = self
            .password_service
            .verify_password(&req.password, &user.password_hash)
            .map_err(AppError::InternalServerError)?;

        if !valid_password {
            return Err(AppError::InvalidCredentials);
        }

        if self.require_activation && !user.is_activated {
            return Err(AppError::Forbidden(
                "your user account must be activated to access this resource".to_string(),
            ));
        }

        let tokens =
            issue_token_pair(user.id, user.role_id, &self.auth_service, &self.sessions).await?;

        tracing::info!(user_id = user.id, "User authenticated");
        Ok(tokens)
    }
}
