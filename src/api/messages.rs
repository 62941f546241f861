use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{AppError, FieldError};
use std::sync::Arc;

use crate::models::{ListMessagesResponse, MessageFilter};
use crate::state::AppState;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub from: Option<String>,
    pub since: Option<String>,
    pub q: Option<String>,
}

/// Range-checked listing request, ready for the store.
#[derive(Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: i64,
    pub offset: i64,
    pub filter: MessageFilter,
}

impl ListMessagesParams {
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut errors = Vec::new();

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            errors.push(FieldError::query(
                "limit",
                format!("limit must be between 1 and {}", MAX_LIMIT),
            ));
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            errors.push(FieldError::query("offset", "offset must be greater than or equal to 0"));
        }

        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        Ok(ListQuery {
            limit,
            offset,
            filter: MessageFilter {
                from: self.from.as_deref().and_then(normalize_sender),
                since: non_empty(self.since),
                q: non_empty(self.q),
            },
        })
    }
}

/// Form decoding turns an unescaped `+` into a space, so `?from=+9198...`
/// arrives as `" 9198..."`. Restore the prefix for bare digit strings.
fn normalize_sender(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.chars().next() {
        None => None,
        Some(c) if c.is_ascii_digit() => Some(format!("+{}", trimmed)),
        Some(_) => Some(trimmed.to_string()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /messages?limit=&offset=&from=&since=&q=
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListMessagesParams>, QueryRejection>,
) -> Result<Json<ListMessagesResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        AppError::validation(vec![FieldError {
            loc: vec!["query".to_string()],
            msg: rejection.body_text(),
            kind: "parse_error".to_string(),
        }])
    })?;
    let query = params.into_query()?;

    let page = state
        .store
        .list(query.limit, query.offset, &query.filter)
        .await?;

    Ok(Json(ListMessagesResponse {
        data: page.rows,
        total: page.total,
        limit: query.limit,
        offset: query.offset,
    }))
}
