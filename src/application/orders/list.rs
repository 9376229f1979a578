use crate::domain::orders::{Order, OrderRepository};
use crate::domain::users::UserId;
use crate::shared::error::AppError;
use crate::shared::pagination::PageParams;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct ListOrdersRequest {
    #[param(inline)]
    pub page: PageParams,
}

/// One page of orders plus the overall count.
#[derive(Debug)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: PageParams,
}

pub struct ListOrdersUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl ListOrdersUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Every order, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, req: ListOrdersRequest) -> Result<OrderPage, AppError> {
        let page = req.page.normalized();

        let orders = self
            .orders
            .find_all(page.limit(), page.offset())
            .await
            .map_err(AppError::InternalServerError)?;
        let total = self
            .orders
            .count()
            .await
            .map_err(AppError::InternalServerError)?;

        Ok(OrderPage {
            orders,
            total,
            page,
        })
    }
}

pub struct ListUserOrdersUseCase {
    orders: Arc<dyn OrderRepository>,
}

impl ListUserOrdersUseCase {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<Order>, AppError> {
        self.orders
            .find_for_user(user_id)
            .await
            .map_err(AppError::InternalServerError)
    }
}
