use crate::presentation::admin;
use crate::presentation::client;
use crate::presentation::handlers;
use crate::presentation::middleware::cors::cors_layer;
use crate::presentation::middleware::rate_limit::rate_limit_layer;
use crate::presentation::openapi::ApiDoc;
use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::state::AppState;

pub fn app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors_allowed_origins)?;
    let rate_limit = rate_limit_layer(state.config.rate_limit_per_minute)?;

    let api = Router::new()
        .merge(client::routes::routes())
        .nest("/admin", admin::routes::routes(state.clone()))
        .layer(rate_limit);

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
