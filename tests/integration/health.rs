use crate::common;
use crate::common::{TestApp, get_request};

use axum::http::StatusCode;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::new();

    let response = app.send(get_request("/health", None)).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
}

#[tokio::test]
#[serial]
async fn test_health_with_database() {
    let pool = setup_test_db_or_skip!();

    let app = grocer::presentation::router::app(common::create_test_app_state(pool)).unwrap();
    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
