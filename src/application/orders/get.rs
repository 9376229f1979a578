use crate::domain::orders::{OrderId, OrderRepository, PlacedOrder};
use crate::domain::users::UserId;
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct GetOrderUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl GetOrderUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Order with its items, visible to its owner and to admins.
    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        actor_id: UserId,
        is_admin: bool,
        id: OrderId,
    ) -> Result<PlacedOrder, AppError> {
        let order = self
            .orders
            .find_by_id(id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

        if !is_admin && !order.is_owned_by(actor_id) {
            return Err(AppError::Forbidden(
                "you do not have access to this order".to_string(),
            ));
        }

        let items = self
            .orders
            .find_items(id)
            .await
            .map_err(AppError::InternalServerError)?;

        Ok(PlacedOrder { order, items })
    }
}
