use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{Any, CorsLayer};

/// CORS policy from a comma-separated origin list; empty or `*` allows any
/// origin.
///
/// Explicit origins also allow credentials so the refresh cookie is sent.
pub fn cors_layer(allowed_origins: &str) -> anyhow::Result<CorsLayer> {
    let allowed_origins = allowed_origins.trim();

    if allowed_origins.is_empty() || allowed_origins == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-refresh-token"),
        ])
        .allow_credentials(true))
}
