use crate::application::orders::get::GetOrderUseCase;
use crate::application::orders::place::{PlaceOrderRequest, PlaceOrderUseCase};
use crate::application::orders::update_item::{
    UpdateItemQuantityRequest, UpdateItemQuantityUseCase,
};
use crate::domain::orders::{OrderId, OrderItemId};
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::{ItemQuantityResource, OrderDetailResource};
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{JsonApiResource, JsonApiResponse};
use crate::shared::validation::JsonBody;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Place an order
///
/// Line totals are `floor(price * amount)`; the header and every line are
/// written in one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 202, description = "Order accepted", body = JsonApiResponse<JsonApiResource<OrderDetailResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown product", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    JsonBody(req): JsonBody<PlaceOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let placed = PlaceOrderUseCase::new(state.orders)
        .execute(auth_user.user.id, req)
        .await?;
    let resource = JsonApiResource::new(
        "orders",
        placed.order.id,
        OrderDetailResource::from(placed),
    );

    Ok((StatusCode::ACCEPTED, Json(JsonApiResponse::new(resource))))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = JsonApiResponse<JsonApiResource<OrderDetailResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Order belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let is_admin = auth_user.is_admin(&state);
    let placed = GetOrderUseCase::new(state.orders)
        .execute(auth_user.user.id, is_admin, id)
        .await?;
    let resource = JsonApiResource::new(
        "orders",
        placed.order.id,
        OrderDetailResource::from(placed),
    );

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resource))))
}

/// Change an order item's quantity
///
/// A quantity of zero removes the item. The order total moves by the same
/// amount as the item total.
#[utoipa::path(
    patch,
    path = "/api/v1/order-items/{id}",
    params(
        ("id" = i64, Path, description = "Order item ID")
    ),
    request_body = UpdateItemQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = JsonApiResponse<JsonApiResource<ItemQuantityResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Order belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Order item not found", body = ErrorResponse),
        (status = 409, description = "Order was removed concurrently", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Orders"
)]
pub async fn update_item_quantity(
    State(state): State<AppState>,
    Path(id): Path<OrderItemId>,
    auth_user: AuthUser,
    JsonBody(req): JsonBody<UpdateItemQuantityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let is_admin = auth_user.is_admin(&state);
    let update = UpdateItemQuantityUseCase::new(state.orders)
        .execute(auth_user.user.id, is_admin, id, req)
        .await?;
    let resource = JsonApiResource::new("order-items", id, ItemQuantityResource::from(update));

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resource))))
}
