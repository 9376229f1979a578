use crate::domain::mailer::{Mailer, WELCOME_TEMPLATE};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{
    CUSTOMER_ROLE_ID, DuplicateEmailError, NewUser, RoleId, UnknownRoleError, User, UserRepository,
};
use crate::infrastructure::mailer::spawn_email;
use crate::shared::error::{AppError, FieldErrors};
use crate::shared::validation::validate_password;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub firstname: String,

    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub lastname: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "must not be more than 32 characters"))]
    pub phone_number: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    /// Defaults to the customer role.
    pub role_id: Option<RoleId>,
}

pub struct RegisterUseCase {
    users: Arc<dyn UserRepository>,
    password_service: Arc<dyn PasswordHashingService>,
    mailer: Arc<dyn Mailer>,
    admin_role_id: RoleId,
    public_base_url: String,
}

impl RegisterUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        password_service: Arc<dyn PasswordHashingService>,
        mailer: Arc<dyn Mailer>,
        admin_role_id: RoleId,
        public_base_url: String,
    ) -> Self {
        Self {
            users,
            password_service,
            mailer,
            admin_role_id,
            public_base_url,
        }
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: RegisterRequest) -> Result<User, AppError> {
        let role_id = req.role_id.unwrap_or(CUSTOMER_ROLE_ID);

        let mut errors = req.validate().err().map(FieldErrors::from).unwrap_or_default();
        errors.check(
            role_id != self.admin_role_id,
            "role_id",
            "cannot self-assign the administrator role",
        );
        errors.into_result()?;

        let password_hash = self
            .password_service
            .hash_password(&req.password)
            .map_err(AppError::InternalServerError)?;

        let activation_token = Uuid::new_v4();
        let user = self
            .users
            .create(NewUser {
                firstname: req.firstname,
                lastname: req.lastname,
                phone_number: req.phone_number,
                email: req.email,
                password_hash,
                role_id,
                activation_token: Some(activation_token),
            })
            .await
            .map_err(|e| {
                if e.is::<DuplicateEmailError>() {
                    AppError::DuplicateEmail
                } else if e.is::<UnknownRoleError>() {
                    AppError::ValidationError(FieldErrors::single(
                        "role_id",
                        "role does not exist",
                    ))
                } else {
                    AppError::InternalServerError(e)
                }
            })?;

        tracing::info!(user_id = user.id, "User registered");

        spawn_email(
            self.mailer.clone(),
            user.email.clone(),
            WELCOME_TEMPLATE,
            json!({
                "userID": user.id,
                "firstname": user.firstname,
                "activationURL": format!(
                    "{}/api/v1/auth/activate/{}",
                    self.public_base_url.trim_end_matches('/'),
                    activation_token
                ),
            }),
        );

        Ok(user)
    }
}
