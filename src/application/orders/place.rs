use crate::domain::orders::{
    NewOrder, OrderLine, OrderRepository, PlacedOrder, ProductId, UnknownProductError,
};
use crate::domain::users::UserId;
use crate::shared::error::{AppError, FieldErrors};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

pub const MAX_ADDRESS_CHARS: usize = 255;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    /// Product id
    pub id: ProductId,
    /// Unit price in minor currency units
    pub price: i64,
    /// Fractional for weight-based products
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub address: String,
    pub products: Vec<OrderLineRequest>,
}

impl PlaceOrderRequest {
    /// Every failing field, with list positions in the field path.
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(!self.address.trim().is_empty(), "address", "must be provided");
        errors.check(
            self.address.chars().count() <= MAX_ADDRESS_CHARS,
            "address",
            "must not be more than 255 characters",
        );
        errors.check(
            !self.products.is_empty(),
            "products",
            "must contain at least one product",
        );

        for (i, line) in self.products.iter().enumerate() {
            errors.check(
                line.price >= 0,
                format!("products[{}].price", i),
                "must not be negative",
            );
            errors.check(
                line.amount.is_finite() && line.amount > 0.0,
                format!("products[{}].amount", i),
                "must be greater than zero",
            );
        }
        errors
    }
}

pub struct PlaceOrderUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl PlaceOrderUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    #[tracing::instrument(skip(self, req), fields(lines = req.products.len()))]
    pub async fn execute(
        &self,
        user_id: UserId,
        req: PlaceOrderRequest,
    ) -> Result<PlacedOrder, AppError> {
        req.field_errors().into_result()?;

        let lines: Vec<OrderLine> = req
            .products
            .iter()
            .map(|line| OrderLine {
                product_id: line.id,
                unit_price: line.price,
                quantity: line.amount,
            })
            .collect();
        let new_order = NewOrder::from_lines(user_id, req.address, &lines).map_err(|e| {
            AppError::ValidationError(FieldErrors::single(
                format!("products[{}].amount", e.index),
                "pushes the order total out of range",
            ))
        })?;

        let placed = self.orders.place(new_order).await.map_err(|e| {
            match e.downcast_ref::<UnknownProductError>() {
                Some(unknown) => AppError::ValidationError(FieldErrors::single(
                    format!("products[{}].id", unknown.index),
                    "product does not exist",
                )),
                None => AppError::InternalServerError(e),
            }
        })?;

        tracing::info!(
            order_id = placed.order.id,
            total = placed.order.total,
            "Order placed"
        );
        Ok(placed)
    }
}
