use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub type UserId = i64;
pub type RoleId = i64;

/// Role seeded for storefront customers.
pub const CUSTOMER_ROLE_ID: RoleId = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role_id: RoleId,
    pub is_activated: bool,
    #[serde(skip)]
    pub activation_token: Option<Uuid>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub activation_token: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.phone_number.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }
}

/// A one-time code allowing a password change without the old password.
#[derive(Debug, Clone)]
pub struct PasswordResetCode {
    pub user_id: UserId,
    pub code: String,
    pub expires_at: OffsetDateTime,
}

impl PasswordResetCode {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Raised by [`UserRepository::create`] and [`UserRepository::update`] when the
/// email is already taken by another account.
#[derive(Debug, thiserror::Error)]
#[error("a user with this email address already exists")]
pub struct DuplicateEmailError;

/// Raised by [`UserRepository::update`] when the row disappeared between the
/// caller's read and the write.
#[derive(Debug, thiserror::Error)]
#[error("user record changed or was removed during update")]
pub struct EditConflictError;

/// Raised when a write references a role id with no row in `roles`.
#[derive(Debug, thiserror::Error)]
#[error("role does not exist")]
pub struct UnknownRoleError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, anyhow::Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error>;
    async fn update(&self, id: UserId, update: UpdateUser) -> Result<User, anyhow::Error>;
    async fn delete(&self, id: UserId) -> Result<bool, anyhow::Error>;

    /// Flip the activation flag for the owner of `token`, clearing the token.
    async fn activate(&self, token: Uuid) -> Result<Option<User>, anyhow::Error>;

    async fn insert_reset_code(&self, code: PasswordResetCode) -> Result<(), anyhow::Error>;
    async fn find_reset_code(&self, code: &str)
    -> Result<Option<PasswordResetCode>, anyhow::Error>;
    /// Delete the code and return it, so only one caller ever receives it.
    async fn consume_reset_code(
        &self,
        code: &str,
    ) -> Result<Option<PasswordResetCode>, anyhow::Error>;
}
