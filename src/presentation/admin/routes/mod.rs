pub mod orders;
pub mod users;

use crate::infrastructure::state::AppState;
use crate::presentation::middleware::auth::require_admin;
use axum::{Router, middleware};

/// Every admin route sits behind [`require_admin`].
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::routes())
        .nest("/users", users::routes())
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
