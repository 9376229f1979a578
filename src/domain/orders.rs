use crate::domain::users::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type OrderId = i64;
pub type OrderItemId = i64;
pub type ProductId = i64;
pub type StatusId = i64;

/// Status every freshly placed order starts in.
pub const ACCEPTED_STATUS_ID: StatusId = 1;
/// Moving an order into this status stamps `delivered_at`.
pub const DELIVERED_STATUS_ID: StatusId = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// `None` once the owning account has been deleted.
    pub user_id: Option<UserId>,
    /// Sum of item totals, in minor currency units.
    pub total: i64,
    pub address: String,
    pub status_id: StatusId,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601::option")]
    pub delivered_at: Option<OffsetDateTime>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Fractional for weight-based units.
    pub quantity: f64,
    pub total: i64,
}

/// A line as requested by the customer, before totals are derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub unit_price: i64,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: f64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub address: String,
    pub status_id: StatusId,
    pub total: i64,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Derive every line total and the header total from the requested lines.
    pub fn from_lines(
        user_id: UserId,
        address: String,
        lines: &[OrderLine],
    ) -> Result<Self, TotalOutOfRangeError> {
        let mut items = Vec::with_capacity(lines.len());
        let mut total: i64 = 0;
        for (index, line) in lines.iter().enumerate() {
            let line_total = line_total(line.unit_price, line.quantity)
                .ok_or(TotalOutOfRangeError { index })?;
            total = total
                .checked_add(line_total)
                .ok_or(TotalOutOfRangeError { index })?;
            items.push(NewOrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                total: line_total,
            });
        }

        Ok(Self {
            user_id,
            address,
            status_id: ACCEPTED_STATUS_ID,
            total,
            items,
        })
    }
}

/// Header plus items as committed.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Outcome of a quantity change. `item` is `None` when the line was deleted.
#[derive(Debug, Clone)]
pub struct ItemQuantityUpdate {
    pub item: Option<OrderItem>,
    pub order: Order,
    pub delta: i64,
}

/// Administrative change to an order header; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStatusUpdate {
    pub status_id: Option<StatusId>,
    /// Explicit delivery time. When absent and the status becomes delivered,
    /// an unset `delivered_at` is stamped with the current time.
    pub delivered_at: Option<OffsetDateTime>,
}

impl OrderStatusUpdate {
    pub fn is_empty(&self) -> bool {
        self.status_id.is_none() && self.delivered_at.is_none()
    }

    /// The `delivered_at` an order carrying `current` ends up with.
    pub fn resolve_delivered_at(
        &self,
        current: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Option<OffsetDateTime> {
        match (self.delivered_at, self.status_id) {
            (Some(at), _) => Some(at),
            (None, Some(DELIVERED_STATUS_ID)) => current.or(Some(now)),
            (None, _) => current,
        }
    }
}

/// `floor(unit_price × quantity)`, or `None` when it does not fit in an `i64`.
pub fn line_total(unit_price: i64, quantity: f64) -> Option<i64> {
    let total = (unit_price as f64 * quantity).floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if total.is_finite() && total >= i64::MIN as f64 && total < i64::MAX as f64 {
        Some(total as i64)
    } else {
        None
    }
}

/// Recompute a stored line for a new quantity.
///
/// Returns `(new_total, delta)` where `delta` is what the parent order total
/// must change by. A zero quantity removes the whole prior contribution.
/// `None` when the new total is out of range.
pub fn reprice_line(
    current_total: i64,
    current_quantity: f64,
    new_quantity: f64,
) -> Option<(i64, i64)> {
    if new_quantity == 0.0 {
        return Some((0, current_total.checked_neg()?));
    }
    let unit_price = (current_total as f64 / current_quantity).floor() as i64;
    let new_total = line_total(unit_price, new_quantity)?;
    Some((new_total, new_total.checked_sub(current_total)?))
}

/// Placing the order would produce a line or header total outside `i64`.
/// `index` is the first line at which the overflow occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("order total overflows at line {index}")]
pub struct TotalOutOfRangeError {
    pub index: usize,
}

/// A quantity change would push the item or its order total outside `i64`.
#[derive(Debug, thiserror::Error)]
#[error("new quantity for item {0} puts the total out of range")]
pub struct ItemTotalOutOfRangeError(pub OrderItemId);

/// A requested product id has no catalog row.
#[derive(Debug, thiserror::Error)]
#[error("product {product_id} (line {index}) does not exist")]
pub struct UnknownProductError {
    pub index: usize,
    pub product_id: ProductId,
}

/// The parent order disappeared while one of its items was being changed.
#[derive(Debug, thiserror::Error)]
#[error("order {0} was removed during the update")]
pub struct OrderVanishedError(pub OrderId);

/// A status id with no row in `statuses`.
#[derive(Debug, thiserror::Error)]
#[error("status {0} does not exist")]
pub struct UnknownStatusError(pub StatusId);

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist header and items in a single transaction.
    async fn place(&self, new_order: NewOrder) -> Result<PlacedOrder, anyhow::Error>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, anyhow::Error>;
    async fn find_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, anyhow::Error>;
    async fn find_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, anyhow::Error>;
    async fn find_for_user(&self, user_id: UserId) -> Result<Vec<Order>, anyhow::Error>;
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Order>, anyhow::Error>;
    async fn count(&self) -> Result<i64, anyhow::Error>;

    /// Change an item's quantity and shift the parent total by the same delta,
    /// atomically. `None` when the item does not exist.
    async fn update_item_quantity(
        &self,
        id: OrderItemId,
        quantity: f64,
    ) -> Result<Option<ItemQuantityUpdate>, anyhow::Error>;

    /// Apply a status/delivery change. `None` when the order does not exist.
    async fn update_status(
        &self,
        id: OrderId,
        update: OrderStatusUpdate,
    ) -> Result<Option<Order>, anyhow::Error>;

    /// Delete the order; its items go with it. `false` when nothing matched.
    async fn delete(&self, id: OrderId) -> Result<bool, anyhow::Error>;
}
