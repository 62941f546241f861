// ============================================================================
// REQUEST ID + REQUEST LOGGING / METRICS MIDDLEWARE
// ============================================================================

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::observability::record_http_request;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns an `x-request-id` to every request (keeping a caller-supplied one)
/// and echoes it on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = match request_id(req.headers()) {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        req.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
        let mut response = next.run(req).await;
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        response
    } else {
        next.run(req).await
    }
}

/// The request id set by [`request_id_middleware`], if any.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Records HTTP metrics and emits one structured log line per request.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = request_id(req.headers()).unwrap_or_default().to_string();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    let endpoint = normalize_path(&path);

    record_http_request(&method, endpoint, status, elapsed.as_secs_f64());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        latency_ms = elapsed.as_secs_f64() * 1000.0,
        "request completed"
    );

    response
}

/// Collapses unknown paths into one label so scanners cannot blow up
/// metric cardinality.
fn normalize_path(path: &str) -> &str {
    match path {
        "/webhook" | "/messages" | "/stats" | "/health/live" | "/health/ready" | "/metrics" => path,
        _ => "other",
    }
}
