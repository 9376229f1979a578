use crate::domain::orders::{
    DELIVERED_STATUS_ID, ItemQuantityUpdate, ItemTotalOutOfRangeError, NewOrder, Order, OrderId,
    OrderItem, OrderItemId, OrderRepository, OrderStatusUpdate, OrderVanishedError, PlacedOrder,
    UnknownProductError, UnknownStatusError, reprice_line,
};
use crate::domain::users::UserId;
use crate::infrastructure::db::models::orders::{OrderDbModel, OrderItemDbModel};
use crate::infrastructure::db::{
    DbPool, FOREIGN_KEY_VIOLATION, NUMERIC_VALUE_OUT_OF_RANGE, constraint_violation,
};
use async_trait::async_trait;

const ORDER_COLUMNS: &str = "id, user_id, total, address, status_id, created_at, delivered_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, total";

#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: DbPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn has_sqlstate(err: &sqlx::Error, sqlstate: &str) -> bool {
    matches!(constraint_violation(err), Some((code, _)) if code == sqlstate)
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, new_order), fields(user_id = new_order.user_id, lines = new_order.items.len()))]
    async fn place(&self, new_order: NewOrder) -> Result<PlacedOrder, anyhow::Error> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, OrderDbModel>(&format!(
            r#"
            INSERT INTO orders (user_id, total, address, status_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(new_order.user_id)
        .bind(new_order.total)
        .bind(&new_order.address)
        .bind(new_order.status_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for (index, item) in new_order.items.iter().enumerate() {
            let inserted = sqlx::query_as::<_, OrderItemDbModel>(&format!(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, total)
                VALUES ($1, $2, $3, $4)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.total)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(row) => items.push(OrderItem::from(row)),
                Err(e) => {
                    tx.rollback().await?;
                    if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) {
                        return Err(UnknownProductError {
                            index,
                            product_id: item.product_id,
                        }
                        .into());
                    }
                    return Err(e.into());
                }
            }
        }

        tx.commit().await?;

        Ok(PlacedOrder {
            order: order.into(),
            items,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, anyhow::Error> {
        let order = sqlx::query_as::<_, OrderDbModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn find_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, anyhow::Error> {
        let items = sqlx::query_as::<_, OrderItemDbModel>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, anyhow::Error> {
        let item = sqlx::query_as::<_, OrderItemDbModel>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn find_for_user(&self, user_id: UserId) -> Result<Vec<Order>, anyhow::Error> {
        let orders = sqlx::query_as::<_, OrderDbModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Order>, anyhow::Error> {
        let orders = sqlx::query_as::<_, OrderDbModel>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> Result<i64, anyhow::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    #[tracing::instrument(skip(self))]
    async fn update_item_quantity(
        &self,
        id: OrderItemId,
        quantity: f64,
    ) -> Result<Option<ItemQuantityUpdate>, anyhow::Error> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, OrderItemDbModel>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let Some((new_total, delta)) = reprice_line(current.total, current.quantity, quantity)
        else {
            tx.rollback().await?;
            return Err(ItemTotalOutOfRangeError(id).into());
        };

        let item = if quantity == 0.0 {
            sqlx::query("DELETE FROM order_items WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            None
        } else {
            let updated = sqlx::query_as::<_, OrderItemDbModel>(&format!(
                r#"
                UPDATE order_items
                SET quantity = $2, total = $3
                WHERE id = $1
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(quantity)
            .bind(new_total)
            .fetch_one(&mut *tx)
            .await?;
            Some(OrderItem::from(updated))
        };

        let order = sqlx::query_as::<_, OrderDbModel>(&format!(
            r#"
            UPDATE orders
            SET total = total + $2
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(current.order_id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await;

        let order = match order {
            Ok(order) => order,
            Err(e) => {
                tx.rollback().await?;
                if has_sqlstate(&e, NUMERIC_VALUE_OUT_OF_RANGE) {
                    return Err(ItemTotalOutOfRangeError(id).into());
                }
                return Err(e.into());
            }
        };

        let Some(order) = order else {
            tx.rollback().await?;
            return Err(OrderVanishedError(current.order_id).into());
        };

        tx.commit().await?;

        Ok(Some(ItemQuantityUpdate {
            item,
            order: order.into(),
            delta,
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(
        &self,
        id: OrderId,
        update: OrderStatusUpdate,
    ) -> Result<Option<Order>, anyhow::Error> {
        let order = sqlx::query_as::<_, OrderDbModel>(&format!(
            r#"
            UPDATE orders
            SET status_id = COALESCE($2, status_id),
                delivered_at = CASE
                    WHEN $3::TIMESTAMPTZ IS NOT NULL THEN $3
                    WHEN $2 = $4 THEN COALESCE(delivered_at, NOW())
                    ELSE delivered_at
                END
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.status_id)
        .bind(update.delivered_at)
        .bind(DELIVERED_STATUS_ID)
        .fetch_optional(&self.pool)
        .await;

        match order {
            Ok(order) => Ok(order.map(Into::into)),
            Err(e) if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) => {
                Err(UnknownStatusError(update.status_id.unwrap_or_default()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: OrderId) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
