#![allow(dead_code)]

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use lyftr_webhook_ws::{create_app_router, db::MessageStore, state::AppState, webhook};
use shared::config::DatabaseConfig;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

pub const SECRET: &str = "testsecret";

pub async fn setup_test_app() -> (Router, Arc<AppState>) {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    let store = MessageStore::connect(&config)
        .await
        .expect("Failed to create in-memory store for test");
    let state = Arc::new(AppState::with_store(store, SECRET.to_string(), 64 * 1024));
    (create_app_router(state.clone()), state)
}

pub fn sign(body: &str) -> String {
    webhook::sign(SECRET, body.as_bytes()).expect("HMAC accepts any key")
}

pub fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(http::Method::POST)
        .uri("/webhook")
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(signature) = signature {
        builder = builder.header("X-Signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: &Router, body: &str) -> (StatusCode, serde_json::Value) {
    let signature = sign(body);
    call(app, webhook_request(body, Some(&signature))).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    call(app, request).await
}

pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

pub fn message_body(id: &str, from: &str, ts: &str, text: &str) -> String {
    format!(
        r#"{{"message_id":"{}","from":"{}","to":"+14155550100","ts":"{}","text":"{}"}}"#,
        id, from, ts, text
    )
}
