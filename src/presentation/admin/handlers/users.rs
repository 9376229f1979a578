use crate::application::users::delete::DeleteUserUseCase;
use crate::domain::users::UserId;
use crate::infrastructure::state::AppState;
use crate::shared::error::{AppError, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Delete a user account
///
/// The user's session and reset codes are removed with it; their orders are
/// kept without an owner.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin / User Management"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<impl IntoResponse, AppError> {
    DeleteUserUseCase::new(state.users).execute(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
