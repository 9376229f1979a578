use crate::presentation::client::handlers::orders;
use axum::{Router, routing::patch};

use crate::infrastructure::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/{id}", patch(orders::update_item_quantity))
}
