use crate::domain::auth::{Session, SessionRepository};
use crate::domain::users::UserId;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::auth::SessionDbModel;
use anyhow::Result;
use async_trait::async_trait;

pub struct PostgresSessionRepository {
    pool: DbPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    /// One statement, so concurrent logins for a user leave exactly one row.
    #[tracing::instrument(skip(self, token_hash))]
    async fn save(&self, user_id: UserId, token_hash: &str) -> Result<Session> {
        let session = sqlx::query_as::<_, SessionDbModel>(
            r#"
            INSERT INTO sessions (user_id, token_hash)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET token_hash = EXCLUDED.token_hash, updated_at = NOW()
            RETURNING user_id, token_hash, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(session.into())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, SessionDbModel>(
            r#"
            SELECT user_id, token_hash, created_at, updated_at
            FROM sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session.map(Into::into))
    }

    #[tracing::instrument(skip(self, current_hash, new_hash))]
    async fn rotate(&self, user_id: UserId, current_hash: &str, new_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET token_hash = $3, updated_at = NOW()
            WHERE user_id = $1 AND token_hash = $2
            "#,
        )
        .bind(user_id)
        .bind(current_hash)
        .bind(new_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, token_hash))]
    async fn remove(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_for_user(&self, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
