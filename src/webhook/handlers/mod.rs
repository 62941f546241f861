pub mod webhook_handler;

pub use webhook_handler::{post_webhook, WebhookOutcome};
