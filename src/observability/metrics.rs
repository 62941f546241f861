// ============================================================================
// PROMETHEUS METRICS
// ============================================================================

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    // ========================================================================
    // HTTP REQUEST METRICS
    // ========================================================================

    /// Total HTTP requests by method, endpoint and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "endpoint", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "endpoint"],
        vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0]
    )
    .unwrap();

    // ========================================================================
    // WEBHOOK METRICS
    // ========================================================================

    /// Webhook deliveries by outcome (created, duplicate, invalid_signature, ...)
    pub static ref WEBHOOK_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "webhook_requests_total",
        "Total webhook deliveries by outcome",
        &["result"]
    )
    .unwrap();

    // ========================================================================
    // DATABASE METRICS
    // ========================================================================

    pub static ref DB_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_queries_total",
        "Total number of message store queries",
        &["query", "status"]
    )
    .unwrap();

    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_query_duration_seconds",
        "Message store query duration in seconds",
        &["query"],
        vec![0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]
    )
    .unwrap();
}

pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);
}

pub fn record_webhook_request(result: &str) {
    WEBHOOK_REQUESTS_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_db_query(query: &str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    DB_QUERIES_TOTAL.with_label_values(&[query, status]).inc();

    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query])
        .observe(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_counter_increments() {
        let before = WEBHOOK_REQUESTS_TOTAL.with_label_values(&["created"]).get();
        record_webhook_request("created");
        assert!(WEBHOOK_REQUESTS_TOTAL.with_label_values(&["created"]).get() > before);
    }

    #[test]
    fn test_db_query_recorded_by_status() {
        let before = DB_QUERIES_TOTAL.with_label_values(&["insert", "error"]).get();
        record_db_query("insert", 0.002, false);
        assert!(DB_QUERIES_TOTAL.with_label_values(&["insert", "error"]).get() > before);
    }
}
