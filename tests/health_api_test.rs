mod common;

use axum::http::StatusCode;
use common::{get, setup_test_app};

#[tokio::test]
async fn test_liveness() {
    let (app, _) = setup_test_app().await;
    let (status, json) = get(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let (app, state) = setup_test_app().await;

    let (status, json) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"status": "ok"}));

    state.store.close().await;

    let (status, json) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json, serde_json::json!({"detail": "not ready"}));

    // Liveness does not depend on the store.
    let (status, _) = get(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(&app, "/stats").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json, serde_json::json!({"detail": "store unavailable"}));
}

#[tokio::test]
async fn test_metrics_exposed() {
    let (app, _) = setup_test_app().await;
    get(&app, "/health/live").await;

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .uri("/metrics")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
}
