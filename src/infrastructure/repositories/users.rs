use crate::domain::users::{
    DuplicateEmailError, EditConflictError, NewUser, PasswordResetCode, UnknownRoleError,
    UpdateUser, User, UserId, UserRepository,
};
use crate::infrastructure::db::models::users::{PasswordResetCodeDbModel, UserDbModel};
use crate::infrastructure::db::{
    DbPool, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, constraint_violation,
};
use async_trait::async_trait;
use uuid::Uuid;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const ROLE_CONSTRAINT: &str = "users_role_id_fkey";

const USER_COLUMNS: &str = "id, firstname, lastname, phone_number, email, password_hash, \
                            role_id, is_activated, activation_token, created_at";

/// Translate email and role constraint violations into their markers.
fn map_write_error(err: sqlx::Error) -> anyhow::Error {
    match constraint_violation(&err) {
        Some((code, Some(constraint)))
            if code == UNIQUE_VIOLATION && constraint == EMAIL_CONSTRAINT =>
        {
            DuplicateEmailError.into()
        }
        Some((code, Some(constraint)))
            if code == FOREIGN_KEY_VIOLATION && constraint == ROLE_CONSTRAINT =>
        {
            UnknownRoleError.into()
        }
        _ => err.into(),
    }
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let user = sqlx::query_as::<_, UserDbModel>(&format!(
            r#"
            INSERT INTO users (firstname, lastname, phone_number, email, password_hash, role_id, activation_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.firstname)
        .bind(new_user.lastname)
        .bind(new_user.phone_number)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role_id)
        .bind(new_user.activation_token)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(user.into())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, UserDbModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(Into::into))
    }

    #[tracing::instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, UserDbModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(Into::into))
    }

    #[tracing::instrument(skip(self, update))]
    async fn update(&self, id: UserId, update: UpdateUser) -> Result<User, anyhow::Error> {
        let user = sqlx::query_as::<_, UserDbModel>(&format!(
            r#"
            UPDATE users
            SET firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                phone_number = COALESCE($4, phone_number),
                email = COALESCE($5, email),
                password_hash = COALESCE($6, password_hash)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.firstname)
        .bind(update.lastname)
        .bind(update.phone_number)
        .bind(update.email)
        .bind(update.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        user.map(Into::into).ok_or_else(|| EditConflictError.into())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: UserId) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, token))]
    async fn activate(&self, token: Uuid) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, UserDbModel>(&format!(
            r#"
            UPDATE users
            SET is_activated = TRUE, activation_token = NULL
            WHERE activation_token = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(Into::into))
    }

    #[tracing::instrument(skip(self, code), fields(user_id = code.user_id))]
    async fn insert_reset_code(&self, code: PasswordResetCode) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_codes (user_id, code, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(code.user_id)
        .bind(code.code)
        .bind(code.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, code))]
    async fn find_reset_code(
        &self,
        code: &str,
    ) -> Result<Option<PasswordResetCode>, anyhow::Error> {
        let found = sqlx::query_as::<_, PasswordResetCodeDbModel>(
            r#"
            SELECT user_id, code, expires_at
            FROM password_reset_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.map(Into::into))
    }

    #[tracing::instrument(skip(self, code))]
    async fn consume_reset_code(
        &self,
        code: &str,
    ) -> Result<Option<PasswordResetCode>, anyhow::Error> {
        let consumed = sqlx::query_as::<_, PasswordResetCodeDbModel>(
            r#"
            DELETE FROM password_reset_codes
            WHERE code = $1
            RETURNING user_id, code, expires_at
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(consumed.map(Into::into))
    }
}
