use crate::presentation::client::handlers::users;
use axum::{Router, routing::patch};

use crate::infrastructure::state::AppState;

/// Client User routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/{id}", patch(users::update_user))
}
