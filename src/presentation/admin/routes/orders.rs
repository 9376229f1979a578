use crate::presentation::admin::handlers::orders;
use axum::{
    Router,
    routing::{get, patch},
};

use crate::infrastructure::state::AppState;

/// Admin Order routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders))
        .route("/{id}", patch(orders::update_order).delete(orders::delete_order))
}
