use crate::application::auth::token_utils::generate_reset_code;
use crate::domain::auth::SessionRepository;
use crate::domain::mailer::{Mailer, PASSWORD_RESET_TEMPLATE};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{EditConflictError, PasswordResetCode, UpdateUser, UserRepository};
use crate::infrastructure::mailer::spawn_email;
use crate::shared::error::AppError;
use crate::shared::validation::validate_password;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use validator::Validate;

/// How long a reset code stays usable.
pub const RESET_CODE_TTL: Duration = Duration::minutes(15);

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RequestPasswordResetRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "must be provided"))]
    pub code: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct VerifyResetCodeRequest {
    #[validate(length(min = 1, message = "must be provided"))]
    pub code: String,
}

pub struct RequestPasswordResetUseCase {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
}

impl RequestPasswordResetUseCase {
    pub fn new(users: Arc<dyn UserRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { users, mailer }
    }

    /// Succeeds whether or not the address belongs to an account.
    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: RequestPasswordResetRequest) -> Result<(), AppError> {
        let Some(user) = self
            .users
            .find_by_email(&req.email)
            .await
            .map_err(AppError::InternalServerError)?
        else {
            tracing::debug!("Password reset requested for unknown address");
            return Ok(());
        };

        let code = PasswordResetCode {
            user_id: user.id,
            code: generate_reset_code(),
            expires_at: OffsetDateTime::now_utc() + RESET_CODE_TTL,
        };
        self.users
            .insert_reset_code(code.clone())
            .await
            .map_err(AppError::InternalServerError)?;

        spawn_email(
            self.mailer.clone(),
            user.email,
            PASSWORD_RESET_TEMPLATE,
            json!({
                "firstname": user.firstname,
                "code": code.code,
                "expiresInMinutes": RESET_CODE_TTL.whole_minutes(),
            }),
        );

        Ok(())
    }
}

/// Checks a reset code without redeeming it.
pub struct VerifyResetCodeUseCase {
    users: Arc<dyn UserRepository>,
}

impl VerifyResetCodeUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, req: VerifyResetCodeRequest) -> Result<(), AppError> {
        let code = self
            .users
            .find_reset_code(&req.code)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or(AppError::TokenExpiredOrInvalid)?;

        if code.is_expired(OffsetDateTime::now_utc()) {
            return Err(AppError::TokenExpiredOrInvalid);
        }
        Ok(())
    }
}

pub struct ResetPasswordUseCase {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl ResetPasswordUseCase {
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

    /// Set a new password from a reset code and sign the user out everywhere.
    ///
    /// The code is deleted before anything else, so concurrent redemptions of
    /// one code see exactly one winner. An expired code is consumed too.
    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, req: ResetPasswordRequest) -> Result<(), AppError> {
        let code = self
            .users
            .consume_reset_code(&req.code)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or(AppError::TokenExpiredOrInvalid)?;

        if code.is_expired(OffsetDateTime::now_utc()) {
            return Err(AppError::TokenExpiredOrInvalid);
        }

        let password_hash = self
            .password_service
            .hash_password(&req.password)
            .map_err(AppError::InternalServerError)?;

        self.users
            .update(
                code.user_id,
                UpdateUser {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| {
                if e.is::<EditConflictError>() {
                    AppError::EditConflict
                } else {
                    AppError::InternalServerError(e)
                }
            })?;

        self.sessions
            .remove_for_user(code.user_id)
            .await
            .map_err(AppError::InternalServerError)?;

        tracing::info!(user_id = code.user_id, "Password reset");
        Ok(())
    }
}
