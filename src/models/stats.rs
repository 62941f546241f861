use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SenderCount {
    #[sqlx(rename = "from_msisdn")]
    pub from: String,
    pub count: i64,
}

/// Aggregate view over the whole store, rendered verbatim by `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    pub total_messages: i64,
    pub senders_count: i64,
    pub messages_per_sender: Vec<SenderCount>,
    pub first_message_ts: Option<String>,
    pub last_message_ts: Option<String>,
}
