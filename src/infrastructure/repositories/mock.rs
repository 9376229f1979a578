//! In-memory repositories mirroring the Postgres constraint behaviour, used by
//! unit tests and router tests that run without a database.

use crate::domain::auth::{Session, SessionRepository};
use crate::domain::orders::{
    ItemQuantityUpdate, ItemTotalOutOfRangeError, NewOrder, Order, OrderId, OrderItem,
    OrderItemId, OrderRepository, OrderStatusUpdate, OrderVanishedError, PlacedOrder, ProductId,
    StatusId, UnknownProductError, UnknownStatusError, reprice_line,
};
use crate::domain::users::{
    CUSTOMER_ROLE_ID, DuplicateEmailError, EditConflictError, NewUser, PasswordResetCode, RoleId,
    UnknownRoleError, UpdateUser, User, UserId, UserRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use time::OffsetDateTime;
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow::anyhow!("mock repository lock poisoned"))
}

/// Role rows seeded by the initial migration.
const SEEDED_ROLES: [RoleId; 2] = [1, CUSTOMER_ROLE_ID];

#[derive(Default)]
struct UserTables {
    next_id: UserId,
    users: Vec<User>,
    reset_codes: Vec<PasswordResetCode>,
}

#[derive(Clone, Default)]
pub struct MockUserRepository {
    inner: Arc<Mutex<UserTables>>,
    /// Sessions cascade with their user when one is attached.
    sessions: Option<MockSessionRepository>,
}

impl MockUserRepository {
    /// Deleting a user also drops its session, like the foreign key cascade.
    pub fn with_sessions(sessions: MockSessionRepository) -> Self {
        Self {
            sessions: Some(sessions),
            ..Default::default()
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut tables = lock(&self.inner)?;
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(DuplicateEmailError.into());
        }
        if !SEEDED_ROLES.contains(&new_user.role_id) {
            return Err(UnknownRoleError.into());
        }

        tables.next_id += 1;
        let user = User {
            id: tables.next_id,
            firstname: new_user.firstname,
            lastname: new_user.lastname,
            phone_number: new_user.phone_number,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role_id: new_user.role_id,
            is_activated: false,
            activation_token: new_user.activation_token,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let tables = lock(&self.inner)?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = lock(&self.inner)?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: UserId, update: UpdateUser) -> Result<User> {
        let mut tables = lock(&self.inner)?;
        if let Some(email) = &update.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(DuplicateEmailError.into());
            }
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(EditConflictError)?;

        if let Some(firstname) = update.firstname {
            user.firstname = firstname;
        }
        if let Some(lastname) = update.lastname {
            user.lastname = lastname;
        }
        if let Some(phone_number) = update.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool> {
        let removed = {
            let mut tables = lock(&self.inner)?;
            let before = tables.users.len();
            tables.users.retain(|u| u.id != id);
            tables.reset_codes.retain(|c| c.user_id != id);
            tables.users.len() < before
        };

        if removed {
            if let Some(sessions) = &self.sessions {
                sessions.remove_for_user(id).await?;
            }
        }
        Ok(removed)
    }

    async fn activate(&self, token: Uuid) -> Result<Option<User>> {
        let mut tables = lock(&self.inner)?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.activation_token == Some(token));

        Ok(user.map(|user| {
            user.is_activated = true;
            user.activation_token = None;
            user.clone()
        }))
    }

    async fn insert_reset_code(&self, code: PasswordResetCode) -> Result<()> {
        lock(&self.inner)?.reset_codes.push(code);
        Ok(())
    }

    async fn find_reset_code(&self, code: &str) -> Result<Option<PasswordResetCode>> {
        let tables = lock(&self.inner)?;
        Ok(tables.reset_codes.iter().find(|c| c.code == code).cloned())
    }

    async fn consume_reset_code(&self, code: &str) -> Result<Option<PasswordResetCode>> {
        let mut tables = lock(&self.inner)?;
        let position = tables.reset_codes.iter().position(|c| c.code == code);
        Ok(position.map(|i| tables.reset_codes.remove(i)))
    }
}

#[derive(Clone, Default)]
pub struct MockSessionRepository {
    sessions: Arc<Mutex<HashMap<UserId, Session>>>,
}

impl MockSessionRepository {
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn save(&self, user_id: UserId, token_hash: &str) -> Result<Session> {
        let mut sessions = lock(&self.sessions)?;
        let now = OffsetDateTime::now_utc();
        let session = sessions
            .entry(user_id)
            .and_modify(|s| {
                s.token_hash = token_hash.to_string();
                s.updated_at = now;
            })
            .or_insert_with(|| Session {
                user_id,
                token_hash: token_hash.to_string(),
                created_at: now,
                updated_at: now,
            });
        Ok(session.clone())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Session>> {
        Ok(lock(&self.sessions)?.get(&user_id).cloned())
    }

    async fn rotate(&self, user_id: UserId, current_hash: &str, new_hash: &str) -> Result<bool> {
        let mut sessions = lock(&self.sessions)?;
        match sessions.get_mut(&user_id) {
            Some(session) if session.token_hash == current_hash => {
                session.token_hash = new_hash.to_string();
                session.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, token_hash: &str) -> Result<bool> {
        let mut sessions = lock(&self.sessions)?;
        let before = sessions.len();
        sessions.retain(|_, s| s.token_hash != token_hash);
        Ok(sessions.len() < before)
    }

    async fn remove_for_user(&self, user_id: UserId) -> Result<bool> {
        Ok(lock(&self.sessions)?.remove(&user_id).is_some())
    }
}

/// Status rows seeded by the initial migration.
const SEEDED_STATUSES: std::ops::RangeInclusive<StatusId> = 1..=5;

#[derive(Default)]
struct OrderTables {
    next_order_id: OrderId,
    next_item_id: OrderItemId,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

#[derive(Clone, Default)]
pub struct MockOrderRepository {
    inner: Arc<Mutex<OrderTables>>,
    /// Known product ids; `None` accepts any id.
    catalog: Option<Arc<HashSet<ProductId>>>,
}

impl MockOrderRepository {
    pub fn with_products(ids: &[ProductId]) -> Self {
        Self {
            catalog: Some(Arc::new(ids.iter().copied().collect())),
            ..Default::default()
        }
    }

    /// Simulate the parent order being removed underneath its items.
    pub fn remove_order_header(&self, id: OrderId) -> Result<()> {
        lock(&self.inner)?.orders.retain(|o| o.id != id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn place(&self, new_order: NewOrder) -> Result<PlacedOrder> {
        if let Some(catalog) = &self.catalog {
            if let Some((index, item)) = new_order
                .items
                .iter()
                .enumerate()
                .find(|(_, item)| !catalog.contains(&item.product_id))
            {
                return Err(UnknownProductError {
                    index,
                    product_id: item.product_id,
                }
                .into());
            }
        }

        let mut tables = lock(&self.inner)?;
        tables.next_order_id += 1;
        let order = Order {
            id: tables.next_order_id,
            user_id: Some(new_order.user_id),
            total: new_order.total,
            address: new_order.address,
            status_id: new_order.status_id,
            created_at: OffsetDateTime::now_utc(),
            delivered_at: None,
        };

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in new_order.items {
            tables.next_item_id += 1;
            items.push(OrderItem {
                id: tables.next_item_id,
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                total: item.total,
            });
        }

        tables.orders.push(order.clone());
        tables.items.extend(items.iter().cloned());
        Ok(PlacedOrder { order, items })
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(lock(&self.inner)?.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let tables = lock(&self.inner)?;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, id: OrderItemId) -> Result<Option<OrderItem>> {
        Ok(lock(&self.inner)?.items.iter().find(|i| i.id == id).cloned())
    }

    async fn find_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let tables = lock(&self.inner)?;
        Ok(tables
            .orders
            .iter()
            .rev()
            .filter(|o| o.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Order>> {
        let tables = lock(&self.inner)?;
        Ok(tables
            .orders
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.inner)?.orders.len() as i64)
    }

    async fn update_item_quantity(
        &self,
        id: OrderItemId,
        quantity: f64,
    ) -> Result<Option<ItemQuantityUpdate>> {
        let mut tables = lock(&self.inner)?;

        let Some(position) = tables.items.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        let current = tables.items[position].clone();

        let Some(order_index) = tables.orders.iter().position(|o| o.id == current.order_id)
        else {
            return Err(OrderVanishedError(current.order_id).into());
        };

        let (new_total, delta) = reprice_line(current.total, current.quantity, quantity)
            .ok_or(ItemTotalOutOfRangeError(id))?;
        let order_total = tables.orders[order_index]
            .total
            .checked_add(delta)
            .ok_or(ItemTotalOutOfRangeError(id))?;

        let item = if quantity == 0.0 {
            tables.items.remove(position);
            None
        } else {
            let item = &mut tables.items[position];
            item.quantity = quantity;
            item.total = new_total;
            Some(item.clone())
        };

        let order = &mut tables.orders[order_index];
        order.total = order_total;

        Ok(Some(ItemQuantityUpdate {
            item,
            order: order.clone(),
            delta,
        }))
    }

    async fn update_status(
        &self,
        id: OrderId,
        update: OrderStatusUpdate,
    ) -> Result<Option<Order>> {
        if let Some(status_id) = update.status_id {
            if !SEEDED_STATUSES.contains(&status_id) {
                return Err(UnknownStatusError(status_id).into());
            }
        }

        let mut tables = lock(&self.inner)?;
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.delivered_at =
            update.resolve_delivered_at(order.delivered_at, OffsetDateTime::now_utc());
        if let Some(status_id) = update.status_id {
            order.status_id = status_id;
        }
        Ok(Some(order.clone()))
    }

    async fn delete(&self, id: OrderId) -> Result<bool> {
        let mut tables = lock(&self.inner)?;
        let before = tables.orders.len();
        tables.orders.retain(|o| o.id != id);
        let removed = tables.orders.len() < before;
        if removed {
            tables.items.retain(|i| i.order_id != id);
        }
        Ok(removed)
    }
}
