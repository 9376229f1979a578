use crate::application::orders::delete::DeleteOrderUseCase;
use crate::application::orders::list::{ListOrdersRequest, ListOrdersUseCase};
use crate::application::orders::update_status::{
    UpdateOrderStatusRequest, UpdateOrderStatusUseCase,
};
use crate::domain::orders::OrderId;
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::OrderResource;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::pagination::PaginationLinkBuilder;
use crate::shared::query::Qs;
use crate::shared::response::{JsonApiMeta, JsonApiResource, JsonApiResponse};
use crate::shared::validation::JsonBody;
use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// List all orders with pagination
#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    params(ListOrdersRequest),
    responses(
        (status = 200, description = "One page of orders, newest first", body = JsonApiResponse<Vec<JsonApiResource<OrderResource>>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 422, description = "Invalid query string", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin / Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Qs(req): Qs<ListOrdersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let page = ListOrdersUseCase::new(state.orders).execute(req).await?;

    let meta = JsonApiMeta::new()
        .with_page(page.page.number)
        .with_per_page(page.page.size)
        .with_total(page.total);
    let links = PaginationLinkBuilder::from_uri(&uri, page.page, page.total).build();

    let resources: Vec<JsonApiResource<OrderResource>> = page
        .orders
        .into_iter()
        .map(|order| JsonApiResource::new("orders", order.id, OrderResource::from(order)))
        .collect();

    Ok((
        StatusCode::OK,
        Json(
            JsonApiResponse::new(resources)
                .with_meta(meta)
                .with_links(links),
        ),
    ))
}

/// Change an order's status or delivery time
///
/// Moving an order to the delivered status stamps `delivered_at` with the
/// current time unless one is given or already set.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = JsonApiResponse<JsonApiResource<OrderResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin / Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    JsonBody(req): JsonBody<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = UpdateOrderStatusUseCase::new(state.orders)
        .execute(id, req)
        .await?;
    let resource = JsonApiResource::new("orders", order.id, OrderResource::from(order));

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resource))))
}

/// Delete an order and its items
#[utoipa::path(
    delete,
    path = "/api/v1/admin/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin / Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse, AppError> {
    DeleteOrderUseCase::new(state.orders).execute(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
