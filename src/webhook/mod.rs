pub mod handlers;
pub mod routes;
pub mod signature;
pub mod validation;

// Re-export main components
pub use handlers::{post_webhook, WebhookOutcome};
pub use routes::create_webhook_router;
pub use signature::{sign, verify, SIGNATURE_HEADER};
pub use validation::{validate, ValidationError};
