use crate::domain::orders::{Order, OrderId, OrderRepository, OrderStatusUpdate, UnknownStatusError};
use crate::shared::error::{AppError, FieldErrors};
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status_id: Option<i64>,
    /// Defaults to now when `status_id` moves the order to delivered
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub delivered_at: Option<OffsetDateTime>,
}

/// Admin-only change of an order's status and delivery time.
pub struct UpdateOrderStatusUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl UpdateOrderStatusUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        id: OrderId,
        req: UpdateOrderStatusRequest,
    ) -> Result<Order, AppError> {
        let update = OrderStatusUpdate {
            status_id: req.status_id,
            delivered_at: req.delivered_at,
        };

        let mut errors = FieldErrors::new();
        errors.check(!update.is_empty(), "status_id", "nothing to update");
        errors.check(
            update.status_id.is_none_or(|id| id > 0),
            "status_id",
            "must be a positive integer",
        );
        errors.into_result()?;

        let order = self
            .orders
            .update_status(id, update)
            .await
            .map_err(|e| {
                if e.is::<UnknownStatusError>() {
                    AppError::ValidationError(FieldErrors::single(
                        "status_id",
                        "status does not exist",
                    ))
                } else {
                    AppError::InternalServerError(e)
                }
            })?
            .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

        tracing::info!(order_id = order.id, status_id = order.status_id, "Order status updated");
        Ok(order)
    }
}
