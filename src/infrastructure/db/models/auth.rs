use crate::domain::auth::Session;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct SessionDbModel {
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<SessionDbModel> for Session {
    fn from(model: SessionDbModel) -> Self {
        Self {
            user_id: model.user_id,
            token_hash: model.token_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
