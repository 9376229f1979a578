pub mod auth;
pub mod order_items;
pub mod orders;
pub mod profile;
pub mod users;

use crate::infrastructure::state::AppState;
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/profile", profile::routes())
        .nest("/users", users::routes())
        .nest("/orders", orders::routes())
        .nest("/order-items", order_items::routes())
}
