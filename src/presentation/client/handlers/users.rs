use crate::application::users::update::{UpdateUserRequest, UpdateUserUseCase};
use crate::domain::users::UserId;
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::UserResource;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{JsonApiResource, JsonApiResponse};
use crate::shared::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Update your own account
///
/// Only the supplied fields change. Changing the password ends the current
/// session.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = JsonApiResponse<JsonApiResource<UserResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 409, description = "Edit conflict", body = ErrorResponse),
        (status = 422, description = "Validation error or duplicate email", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = UpdateUserUseCase::new(state.users, state.sessions, state.password_service);

    let user = use_case.execute(auth_user.user.id, id, req).await?;
    let resource = JsonApiResource::new("users", user.id, UserResource::from(user));

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resource))))
}
