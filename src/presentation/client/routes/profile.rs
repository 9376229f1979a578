use crate::presentation::client::handlers::profile;
use axum::{Router, routing::get};

use crate::infrastructure::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(profile::me))
        .route("/orders", get(profile::orders))
}
