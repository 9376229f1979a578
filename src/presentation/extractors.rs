use crate::application::auth::identity::{Identity, ResolveIdentityUseCase};
use crate::domain::auth::Claims;
use crate::domain::users::User;
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))
}

/// Authenticated user extractor
///
/// Validates the access token and loads the user it names, so a token that
/// outlived its account is rejected.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub claims: Claims,
}

impl AuthUser {
    pub fn is_admin(&self, state: &AppState) -> bool {
        self.claims.role_id == state.config.admin_role_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let Identity { user, claims } =
            ResolveIdentityUseCase::new(state.users.clone(), state.auth_service.clone())
                .execute(token)
                .await?;

        Ok(AuthUser { user, claims })
    }
}

/// Authenticated user holding the administrator role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if !auth_user.is_admin(state) {
            return Err(AppError::Forbidden("Insufficient permissions".to_string()));
        }

        Ok(AdminUser(auth_user))
    }
}
