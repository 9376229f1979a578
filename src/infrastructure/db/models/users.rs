use crate::domain::users::{PasswordResetCode, User};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserDbModel {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i64,
    pub is_activated: bool,
    pub activation_token: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

impl From<UserDbModel> for User {
    fn from(model: UserDbModel) -> Self {
        Self {
            id: model.id,
            firstname: model.firstname,
            lastname: model.lastname,
            phone_number: model.phone_number,
            email: model.email,
            password_hash: model.password_hash,
            role_id: model.role_id,
            is_activated: model.is_activated,
            activation_token: model.activation_token,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetCodeDbModel {
    pub user_id: i64,
    pub code: String,
    pub expires_at: OffsetDateTime,
}

impl From<PasswordResetCodeDbModel> for PasswordResetCode {
    fn from(model: PasswordResetCodeDbModel) -> Self {
        Self {
            user_id: model.user_id,
            code: model.code,
            expires_at: model.expires_at,
        }
    }
}
