use serde::{Deserialize, Serialize};

/// Webhook envelope as it arrives on the wire, before validation.
///
/// Every field is optional so that a missing field is reported by the
/// validator alongside the other violations instead of failing decoding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    pub message_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub ts: Option<String>,
    pub text: Option<String>,
}

/// A message that passed validation and may be handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub ts: String,
    pub text: Option<String>,
}

/// A persisted row. `created_at` is server-assigned and only kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredMessage {
    pub message_id: String,
    #[serde(rename = "from")]
    pub from_msisdn: String,
    #[serde(rename = "to")]
    pub to_msisdn: String,
    pub ts: String,
    pub text: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Conjunctive filters for listing. `None` means "not filtered".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub from: Option<String>,
    pub since: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MessagePage {
    pub rows: Vec<StoredMessage>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ListMessagesResponse {
    pub data: Vec<StoredMessage>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
