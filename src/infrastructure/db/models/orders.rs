use crate::domain::orders::{Order, OrderItem};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct OrderDbModel {
    pub id: i64,
    pub user_id: Option<i64>,
    pub total: i64,
    pub address: String,
    pub status_id: i64,
    pub created_at: OffsetDateTime,
    pub delivered_at: Option<OffsetDateTime>,
}

impl From<OrderDbModel> for Order {
    fn from(model: OrderDbModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            total: model.total,
            address: model.address,
            status_id: model.status_id,
            created_at: model.created_at,
            delivered_at: model.delivered_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemDbModel {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: f64,
    pub total: i64,
}

impl From<OrderItemDbModel> for OrderItem {
    fn from(model: OrderItemDbModel) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            total: model.total,
        }
    }
}
