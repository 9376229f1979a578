use crate::domain::orders::{
    ItemQuantityUpdate, ItemTotalOutOfRangeError, OrderItemId, OrderRepository,
    OrderVanishedError,
};
use crate::domain::users::UserId;
use crate::shared::error::{AppError, FieldErrors};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateItemQuantityRequest {
    /// New quantity; zero removes the item from the order
    pub quantity: f64,
}

pub struct UpdateItemQuantityUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl UpdateItemQuantityUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        actor_id: UserId,
        is_admin: bool,
        id: OrderItemId,
        req: UpdateItemQuantityRequest,
    ) -> Result<ItemQuantityUpdate, AppError> {
        let mut errors = FieldErrors::new();
        errors.check(
            req.quantity.is_finite() && req.quantity >= 0.0,
            "quantity",
            "must be zero or a positive number",
        );
        errors.into_result()?;

        let item = self
            .orders
            .find_item(id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::NotFound("order item not found".to_string()))?;

        if !is_admin {
            let order = self
                .orders
                .find_by_id(item.order_id)
                .await
                .map_err(AppError::InternalServerError)?
                .ok_or(AppError::EditConflict)?;
            if !order.is_owned_by(actor_id) {
                return Err(AppError::Forbidden(
                    "you do not have access to this order".to_string(),
                ));
            }
        }

        let update = self
            .orders
            .update_item_quantity(id, req.quantity)
            .await
            .map_err(|e| {
                if e.is::<OrderVanishedError>() {
                    AppError::EditConflict
                } else if e.is::<ItemTotalOutOfRangeError>() {
                    AppError::ValidationError(FieldErrors::single(
                        "quantity",
                        "pushes the order total out of range",
                    ))
                } else {
                    AppError::InternalServerError(e)
                }
            })?
            .ok_or_else(|| AppError::NotFound("order item not found".to_string()))?;

        tracing::info!(
            order_id = update.order.id,
            delta = update.delta,
            removed = update.item.is_none(),
            "Order item quantity changed"
        );
        Ok(update)
    }
}
