use crate::presentation::extractors::AdminUser;
use axum::{extract::Request, middleware::Next, response::Response};

/// Route layer admitting only administrators.
///
/// Rejections come from the [`AdminUser`] extractor: 401 without a valid
/// access token, 403 for any other role.
pub async fn require_admin(AdminUser(admin): AdminUser, request: Request, next: Next) -> Response {
    tracing::debug!(user_id = admin.user.id, "Admin access granted");
    next.run(request).await
}
