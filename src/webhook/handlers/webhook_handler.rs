use crate::models::{InsertOutcome, StatusResponse};
use crate::observability::{record_webhook_request, request_id};
use crate::state::AppState;
use crate::webhook::signature::{self, SIGNATURE_HEADER};
use crate::webhook::validation;
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use shared::AppError;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Result of one webhook delivery, as recorded in the audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Created,
    Duplicate,
    InvalidSignature,
    InvalidPayload,
    StoreError,
}

impl WebhookOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookOutcome::Created => "created",
            WebhookOutcome::Duplicate => "duplicate",
            WebhookOutcome::InvalidSignature => "invalid_signature",
            WebhookOutcome::InvalidPayload => "invalid_payload",
            WebhookOutcome::StoreError => "store_error",
        }
    }
}

/// POST /webhook
///
/// The body is taken as raw bytes so the signature is checked against exactly
/// what was sent, before any JSON decoding. New and duplicate deliveries get
/// the same `200 {"status":"ok"}`.
pub async fn post_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let start = Instant::now();

    let (outcome, message_id, result) = ingest(&state, &headers, &body).await;

    record_webhook_request(outcome.as_str());
    info!(
        request_id = request_id(&headers).unwrap_or_default(),
        outcome = outcome.as_str(),
        message_id = message_id.as_deref(),
        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
        "webhook processed"
    );

    result.map(|_| Json(StatusResponse::ok()))
}

async fn ingest(
    state: &AppState,
    headers: &HeaderMap,
    raw_body: &[u8],
) -> (WebhookOutcome, Option<String>, Result<(), AppError>) {
    let presented = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    if !signature::verify(&state.webhook_secret, raw_body, presented) {
        return (
            WebhookOutcome::InvalidSignature,
            None,
            Err(AppError::authentication("invalid signature")),
        );
    }

    let payload = match validation::parse_payload(raw_body) {
        Ok(payload) => payload,
        Err(e) => return (WebhookOutcome::InvalidPayload, None, Err(e.into())),
    };

    let message = match validation::validate(&payload) {
        Ok(message) => message,
        Err(e) => {
            let message_id = payload.message_id.filter(|id| !id.is_empty());
            return (WebhookOutcome::InvalidPayload, message_id, Err(e.into()));
        }
    };

    match state.store.insert(&message).await {
        Ok(InsertOutcome::Inserted) => (WebhookOutcome::Created, Some(message.message_id), Ok(())),
        Ok(InsertOutcome::Duplicate) => (WebhookOutcome::Duplicate, Some(message.message_id), Ok(())),
        Err(e) => (WebhookOutcome::StoreError, Some(message.message_id), Err(e)),
    }
}
