use shared::{Config, Result};

use crate::db::MessageStore;

/// Shared application state.
/// Built once at startup from [`Config`] and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: MessageStore,
    pub webhook_secret: String,
    pub max_body_bytes: usize,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let store = MessageStore::connect(&config.database).await?;
        tracing::info!("✅ Message store ready");

        Ok(Self::with_store(
            store,
            config.webhook.secret.clone(),
            config.webhook.max_body_bytes,
        ))
    }

    pub fn with_store(store: MessageStore, webhook_secret: String, max_body_bytes: usize) -> Self {
        Self {
            store,
            webhook_secret,
            max_body_bytes,
        }
    }
}
