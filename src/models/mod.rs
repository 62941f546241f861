pub mod message;
pub mod stats;

pub use message::{
    InsertOutcome, ListMessagesResponse, Message, MessageFilter, MessagePage, StatusResponse,
    StoredMessage, WebhookPayload,
};
pub use stats::{MessageStats, SenderCount};
