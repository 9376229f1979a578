use crate::domain::auth::{AuthService, Claims};
use crate::domain::users::{User, UserRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

/// The caller behind a verified access token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    pub claims: Claims,
}

pub struct ResolveIdentityUseCase {
    users: Arc<dyn UserRepository>,
    auth_service: Arc<dyn AuthService>,
}

impl ResolveIdentityUseCase {
    pub fn new(users: Arc<dyn UserRepository>, auth_service: Arc<dyn AuthService>) -> Self {
        Self {
            users,
            auth_service,
        }
    }

    /// A bad token and a deleted account look the same to the client.
    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, access_token: &str) -> Result<Identity, AppError> {
        let claims = self
            .auth_service
            .decode_access_token(access_token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::Unauthorized(format!("user {} no longer exists", claims.user_id)))?;

        Ok(Identity { user, claims })
    }
}
