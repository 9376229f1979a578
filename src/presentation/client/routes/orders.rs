use crate::presentation::client::handlers::orders;
use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place_order))
        .route("/{id}", get(orders::get_order))
}
