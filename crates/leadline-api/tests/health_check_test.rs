//! Health and liveness endpoints.

use http::StatusCode;
use leadline_testing::TestApp;

#[tokio::test]
async fn health_reports_store_up() {
    let app = TestApp::new();

    let response = app.get("/health").await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json().unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "up");
    assert!(body["checks"]["store"].get("message").is_none());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_is_unavailable_when_store_is_down() {
    let app = TestApp::new();
    app.store.set_unhealthy(true).await;

    let response = app.get("/health").await.unwrap();

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json().unwrap()["checks"]["store"]["status"], "down");
}

#[tokio::test]
async fn health_is_unavailable_without_profile() {
    let app = TestApp::unconfigured("PRODUCTION");

    let response = app.get("/health").await.unwrap();

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json().unwrap()["status"], "unhealthy");
}

#[tokio::test]
async fn liveness_does_not_touch_the_store() {
    let app = TestApp::new();
    app.store.set_unhealthy(true).await;

    let response = app.get("/live").await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().unwrap()["status"], "alive");
}
