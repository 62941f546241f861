//! Configuration management for the webhook service

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub webhook: WebhookConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub secret: String,
    pub max_body_bytes: usize,
}

// Keep the secret out of debug logs.
impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &"<redacted>")
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:messages.db".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 5,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `WEBHOOK_SECRET` is mandatory; every other key has a default. Numeric
    /// keys that are present but unparsable are rejected rather than defaulted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("WEBHOOK_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::configuration("WEBHOOK_SECRET must be set"))?;

        let defaults = DatabaseConfig::default();

        Ok(Config {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(defaults.url),
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
                acquire_timeout_seconds: parse_or(
                    &lookup,
                    "DATABASE_ACQUIRE_TIMEOUT_SECONDS",
                    defaults.acquire_timeout_seconds,
                )?,
            },
            webhook: WebhookConfig {
                secret,
                max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 64 * 1024)?,
            },
            app: AppConfig {
                log_level: lookup("LOG_LEVEL")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "info".to_string())
                    .to_lowercase(),
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", 8000)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} has an invalid value: {:?}", key, raw))),
        _ => Ok(default),
    }
}
