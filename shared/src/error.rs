//! Error handling for the webhook service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, AppError>;

/// Body returned for every error response: `{"detail": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}

/// One structural violation, located by the part of the request it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn body(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: "value_error".to_string(),
        }
    }

    pub fn query(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["query".to_string(), field.to_string()],
            msg: msg.into(),
            kind: "value_error".to_string(),
        }
    }

    pub fn field(&self) -> &str {
        self.loc.last().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Validation error: {} field(s) rejected", .errors.len())]
    Validation { errors: Vec<FieldError> },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            // Storage faults surface as "store unavailable" on every path.
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "AUTH_ERROR",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Configuration { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// The client-facing `detail` value. Storage and internal faults never
    /// leak their underlying message.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            AppError::Authentication { message } => serde_json::Value::String(message.clone()),
            AppError::Validation { errors } => serde_json::to_value(errors).unwrap_or_default(),
            AppError::ServiceUnavailable { service } => serde_json::Value::String(service.clone()),
            AppError::Database(_) => serde_json::Value::String("store unavailable".to_string()),
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                serde_json::Value::String("internal error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "API Error");
        } else {
            tracing::warn!(code = self.error_code(), error = %self, "API Error");
        }

        (status, Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::authentication("invalid signature").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::service_unavailable("not ready").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_detail_shapes() {
        let detail = AppError::authentication("invalid signature").detail();
        assert_eq!(detail, serde_json::json!("invalid signature"));

        let detail = AppError::validation(vec![FieldError::body("from", "bad number")]).detail();
        assert_eq!(
            detail,
            serde_json::json!([{"loc": ["body", "from"], "msg": "bad number", "type": "value_error"}])
        );

        // Storage internals are not exposed.
        let detail = AppError::Database(sqlx::Error::PoolTimedOut).detail();
        assert_eq!(detail, serde_json::json!("store unavailable"));
    }

    #[test]
    fn test_field_error_accessor() {
        assert_eq!(FieldError::query("limit", "too big").field(), "limit");
    }
}
