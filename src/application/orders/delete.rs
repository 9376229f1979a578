use crate::domain::orders::{OrderId, OrderRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct DeleteOrderUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl DeleteOrderUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: OrderId) -> Result<(), AppError> {
        let deleted = self
            .orders
            .delete(id)
            .await
            .map_err(AppError::InternalServerError)?;

        if !deleted {
            return Err(AppError::NotFound("order not found".to_string()));
        }

        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }
}
