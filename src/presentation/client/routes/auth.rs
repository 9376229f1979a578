use crate::presentation::client::handlers::auth;
use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::state::AppState;

/// Client Auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/authenticate", post(auth::authenticate))
        .route("/refresh", get(auth::refresh_token))
        .route("/logout", get(auth::logout))
        .route("/activate/{token}", get(auth::activate))
        .route("/request-password-reset", post(auth::request_password_reset))
        .route("/verify-reset-code", post(auth::verify_reset_code))
        .route("/reset-password", post(auth::reset_password))
}
