use crate::common::{self, TestApp, get_request};

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let app = TestApp::with_config(common::config_with(&[("RATE_LIMIT_PER_MINUTE", "2")]));

    for _ in 0..2 {
        let response = app.send(get_request("/api/v1/profile/me", None)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let limited = app.send(get_request("/api/v1/profile/me", None)).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let app = TestApp::with_config(common::config_with(&[("RATE_LIMIT_PER_MINUTE", "1")]));

    for _ in 0..3 {
        let response = app.send(get_request("/health", None)).await;
        assert_ne!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let app = TestApp::with_config(common::config_with(&[(
        "CORS_ALLOWED_ORIGINS",
        "https://shop.grocer.test",
    )]));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/authenticate")
        .header(header::ORIGIN, "https://shop.grocer.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://shop.grocer.test"
    );
    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();

    let response = app.send(get_request("/api-docs/openapi.json", None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["info"]["title"], "Grocer API");
    assert!(response.body["paths"]["/api/v1/orders"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/v1/nowhere", None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
