use crate::application::auth::token_utils::TokenResponse;
use crate::domain::orders::{ItemQuantityUpdate, Order, OrderItem, PlacedOrder};
use crate::domain::users::User;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub role_id: i64,
    pub is_activated: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResource {
    fn from(user: User) -> Self {
        Self {
            firstname: user.firstname,
            lastname: user.lastname,
            phone_number: user.phone_number,
            email: user.email,
            role_id: user.role_id,
            is_activated: user.is_activated,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResource {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenResponse> for AuthTokenResource {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResource {
    pub user_id: Option<i64>,
    /// Minor currency units
    pub total: i64,
    pub address: String,
    pub status_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub delivered_at: Option<OffsetDateTime>,
}

impl From<Order> for OrderResource {
    fn from(order: Order) -> Self {
        Self {
            user_id: order.user_id,
            total: order.total,
            address: order.address,
            status_id: order.status_id,
            created_at: order.created_at,
            delivered_at: order.delivered_at,
        }
    }
}

/// Line item embedded in an order document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResource {
    pub id: i64,
    pub product_id: i64,
    pub quantity: f64,
    pub total: i64,
}

impl From<OrderItem> for OrderItemResource {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            total: item.total,
        }
    }
}

/// Order header together with its items.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResource {
    pub user_id: Option<i64>,
    pub total: i64,
    pub address: String,
    pub status_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    pub items: Vec<OrderItemResource>,
}

impl From<PlacedOrder> for OrderDetailResource {
    fn from(placed: PlacedOrder) -> Self {
        Self {
            user_id: placed.order.user_id,
            total: placed.order.total,
            address: placed.order.address,
            status_id: placed.order.status_id,
            created_at: placed.order.created_at,
            items: placed.items.into_iter().map(OrderItemResource::from).collect(),
        }
    }
}

/// Result of changing an item's quantity.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuantityResource {
    pub order_id: i64,
    /// Zero when the item was removed.
    pub quantity: f64,
    pub total: i64,
    pub removed: bool,
    pub order_total: i64,
    /// Change applied to the order total.
    pub delta: i64,
}

impl From<ItemQuantityUpdate> for ItemQuantityResource {
    fn from(update: ItemQuantityUpdate) -> Self {
        let (quantity, total) = update
            .item
            .as_ref()
            .map(|item| (item.quantity, item.total))
            .unwrap_or((0.0, 0));

        Self {
            order_id: update.order.id,
            quantity,
            total,
            removed: update.item.is_none(),
            order_total: update.order.total,
            delta: update.delta,
        }
    }
}
