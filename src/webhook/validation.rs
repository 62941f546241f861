use lazy_static::lazy_static;
use regex::Regex;
use shared::{AppError, FieldError};

use crate::models::{Message, WebhookPayload};

pub const MAX_TEXT_CHARS: usize = 4096;

lazy_static! {
    // ASCII digits only; `\d` would also admit non-ASCII decimal digits.
    static ref E164: Regex = Regex::new(r"^\+[1-9][0-9]{1,14}$").unwrap();
}

/// Structural rejection of a webhook body, one entry per violated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid webhook payload: {} field(s) rejected", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.errors)
    }
}

// ============================================================================
// VALIDATION FUNCTIONS
// ============================================================================

/// Decodes the raw body. Only called once the signature has been verified.
pub fn parse_payload(raw_body: &[u8]) -> Result<WebhookPayload, ValidationError> {
    serde_json::from_slice(raw_body).map_err(|e| ValidationError {
        errors: vec![FieldError {
            loc: vec!["body".to_string()],
            msg: format!("invalid JSON body: {}", e),
            kind: "json_invalid".to_string(),
        }],
    })
}

/// Pure check of every field; reports all violations at once.
pub fn validate(payload: &WebhookPayload) -> Result<Message, ValidationError> {
    let mut errors = Vec::new();

    let message_id = required(&mut errors, "message_id", payload.message_id.as_deref());
    if message_id.is_some_and(str::is_empty) {
        errors.push(FieldError::body("message_id", "message_id must not be empty"));
    }

    let from = required(&mut errors, "from", payload.from.as_deref());
    if let Some(from) = from {
        if let Err(e) = validate_e164("from", from) {
            errors.push(e);
        }
    }

    let to = required(&mut errors, "to", payload.to.as_deref());
    if let Some(to) = to {
        if let Err(e) = validate_e164("to", to) {
            errors.push(e);
        }
    }

    let ts = required(&mut errors, "ts", payload.ts.as_deref());
    if let Some(ts) = ts {
        if !ts.ends_with('Z') {
            errors.push(FieldError::body("ts", "ts must be a UTC timestamp ending in 'Z'"));
        }
    }

    if let Some(text) = payload.text.as_deref() {
        if text.chars().count() > MAX_TEXT_CHARS {
            errors.push(FieldError::body(
                "text",
                format!("text must be at most {} characters", MAX_TEXT_CHARS),
            ));
        }
    }

    match (message_id, from, to, ts) {
        (Some(message_id), Some(from), Some(to), Some(ts)) if errors.is_empty() => Ok(Message {
            message_id: message_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            ts: ts.to_string(),
            text: payload.text.clone(),
        }),
        _ => Err(ValidationError { errors }),
    }
}

pub fn is_e164(value: &str) -> bool {
    E164.is_match(value)
}

fn validate_e164(field: &str, value: &str) -> Result<(), FieldError> {
    if is_e164(value) {
        Ok(())
    } else {
        Err(FieldError::body(
            field,
            format!("{} must be an E.164 number ('+' followed by 2-15 digits, no leading zero)", field),
        ))
    }
}

fn required<'a>(errors: &mut Vec<FieldError>, field: &str, value: Option<&'a str>) -> Option<&'a str> {
    if value.is_none() {
        errors.push(FieldError {
            loc: vec!["body".to_string(), field.to_string()],
            msg: "field required".to_string(),
            kind: "missing".to_string(),
        });
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> WebhookPayload {
        WebhookPayload {
            message_id: Some("m1".to_string()),
            from: Some("+919876543210".to_string()),
            to: Some("+14155550100".to_string()),
            ts: Some("2025-01-15T10:00:00Z".to_string()),
            text: Some("Hello".to_string()),
        }
    }

    fn fields(err: &ValidationError) -> Vec<&str> {
        err.errors.iter().map(FieldError::field).collect()
    }

    #[test]
    fn test_valid_payload() {
        let message = validate(&payload()).unwrap();
        assert_eq!(message.message_id, "m1");
        assert_eq!(message.from, "+919876543210");
        assert_eq!(message.text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_e164_rules() {
        assert!(is_e164("+1234567890123"));
        assert!(is_e164("+12"));
        assert!(is_e164("+123456789012345"));
        assert!(!is_e164("1234567890"));
        assert!(!is_e164("+0123"));
        assert!(!is_e164(""));
        assert!(!is_e164("+1"));
        assert!(!is_e164("+1234567890123456"));
        assert!(!is_e164("+12 34"));
        assert!(!is_e164("+١٢٣٤"));
    }

    #[test]
    fn test_invalid_numbers_reported_per_field() {
        let mut p = payload();
        p.from = Some("1234567890".to_string());
        p.to = Some("+0123".to_string());
        let err = validate(&p).unwrap_err();
        assert_eq!(fields(&err), vec!["from", "to"]);
    }

    #[test]
    fn test_empty_message_id() {
        let mut p = payload();
        p.message_id = Some(String::new());
        let err = validate(&p).unwrap_err();
        assert_eq!(fields(&err), vec!["message_id"]);
    }

    #[test]
    fn test_ts_must_end_in_z() {
        let mut p = payload();
        p.ts = Some("2025-01-15T10:00:00+00:00".to_string());
        let err = validate(&p).unwrap_err();
        assert_eq!(fields(&err), vec!["ts"]);
    }

    #[test]
    fn test_text_length_limit_counts_characters() {
        let mut p = payload();
        p.text = Some("é".repeat(MAX_TEXT_CHARS));
        assert!(validate(&p).is_ok());

        p.text = Some("a".repeat(MAX_TEXT_CHARS + 1));
        let err = validate(&p).unwrap_err();
        assert_eq!(fields(&err), vec!["text"]);
    }

    #[test]
    fn test_text_is_optional() {
        let mut p = payload();
        p.text = None;
        assert_eq!(validate(&p).unwrap().text, None);
    }

    #[test]
    fn test_missing_fields() {
        let err = validate(&WebhookPayload::default()).unwrap_err();
        assert_eq!(fields(&err), vec!["message_id", "from", "to", "ts"]);
        assert!(err.errors.iter().all(|e| e.kind == "missing"));
    }

    #[test]
    fn test_parse_payload() {
        let p = parse_payload(br#"{"message_id":"m1","from":"+12","to":"+34","ts":"xZ","extra":1}"#).unwrap();
        assert_eq!(p.message_id.as_deref(), Some("m1"));
        assert_eq!(p.text, None);

        assert!(parse_payload(b"not json").is_err());
        assert!(parse_payload(br#"{"message_id":42}"#).is_err());
    }
}
