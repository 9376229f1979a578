use crate::application::orders::list::ListUserOrdersUseCase;
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::{OrderResource, UserResource};
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{JsonApiMeta, JsonApiResource, JsonApiResponse};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profile/me",
    responses(
        (status = 200, description = "Authenticated user", body = JsonApiResponse<JsonApiResource<UserResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Profile"
)]
pub async fn me(auth_user: AuthUser) -> Result<impl IntoResponse, AppError> {
    let user = auth_user.user;
    let resource = JsonApiResource::new("users", user.id, UserResource::from(user));

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resource))))
}

/// Orders placed by the current user, newest first
#[utoipa::path(
    get,
    path = "/api/v1/profile/orders",
    responses(
        (status = 200, description = "The user's orders", body = JsonApiResponse<Vec<JsonApiResource<OrderResource>>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Profile"
)]
pub async fn orders(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = ListUserOrdersUseCase::new(state.orders)
        .execute(auth_user.user.id)
        .await?;
    let total = orders.len() as i64;

    let resources: Vec<JsonApiResource<OrderResource>> = orders
        .into_iter()
        .map(|order| JsonApiResource::new("orders", order.id, OrderResource::from(order)))
        .collect();

    Ok((
        StatusCode::OK,
        Json(JsonApiResponse::new(resources).with_meta(JsonApiMeta::new().with_total(total))),
    ))
}
