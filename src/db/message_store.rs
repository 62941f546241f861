//! Durable, uniquely keyed message collection.
//!
//! Uniqueness is enforced by the `message_id` primary key and a single
//! `INSERT ... ON CONFLICT DO NOTHING` statement, so concurrent deliveries of
//! the same id need no locking above this layer.

use chrono::{SecondsFormat, Utc};
use shared::config::DatabaseConfig;
use shared::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::time::Instant;
use tracing::{debug, error};

use crate::db::create_pool;
use crate::models::{
    InsertOutcome, Message, MessageFilter, MessagePage, MessageStats, SenderCount, StoredMessage,
};
use crate::observability::record_db_query;

pub const TOP_SENDERS_LIMIT: i64 = 10;

const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    from_msisdn TEXT NOT NULL,
    to_msisdn TEXT NOT NULL,
    ts TEXT NOT NULL,
    text TEXT,
    text_lower TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
)
"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_messages_ts_id ON messages (ts, message_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_from ON messages (from_msisdn, ts, message_id)",
];

#[derive(Debug, Clone)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    /// Connects and makes sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = create_pool(config).await?;
        let store = Self::from_pool(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_MESSAGES_TABLE).execute(&self.pool).await?;
        for statement in CREATE_INDEXES {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Closes the pool; later operations fail with a store error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Trivial probe used by the readiness check.
    pub async fn ping(&self) -> Result<()> {
        let start = Instant::now();
        let result = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        observe("ping", start, &result);
        result?;
        Ok(())
    }

    /// Adds `message` unless its id is already stored. The first write wins;
    /// a redelivery never overwrites the stored row.
    pub async fn insert(&self, message: &Message) -> Result<InsertOutcome> {
        let start = Instant::now();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        // SQLite's lower() only folds ASCII, so the search column is folded here.
        let text_lower = message.text.as_deref().unwrap_or_default().to_lowercase();

        let result = sqlx::query(
            r#"
            INSERT INTO messages
                (message_id, from_msisdn, to_msisdn, ts, text, text_lower, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (message_id) DO NOTHING
            "#,
        )
        .bind(&message.message_id)
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.ts)
        .bind(message.text.as_deref())
        .bind(&text_lower)
        .bind(&created_at)
        .execute(&self.pool)
        .await;
        observe("insert", start, &result);

        let done = result.map_err(|e| {
            error!(message_id = %message.message_id, error = %e, "Failed to insert message");
            e
        })?;

        if done.rows_affected() == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            debug!(message_id = %message.message_id, "Duplicate message ignored");
            Ok(InsertOutcome::Duplicate)
        }
    }

    /// One page of messages ordered by `(ts, message_id)`, plus the number of
    /// rows matching `filter` regardless of paging. Both come from the same
    /// read transaction.
    pub async fn list(&self, limit: i64, offset: i64, filter: &MessageFilter) -> Result<MessagePage> {
        let start = Instant::now();
        let result = self.list_in_snapshot(limit, offset, filter).await;
        observe("list", start, &result);
        result.map_err(|e| {
            error!(?filter, limit, offset, error = %e, "Failed to list messages");
            e.into()
        })
    }

    async fn list_in_snapshot(
        &self,
        limit: i64,
        offset: i64,
        filter: &MessageFilter,
    ) -> std::result::Result<MessagePage, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM messages");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await?;

        let mut rows_query = QueryBuilder::<Sqlite>::new(
            "SELECT message_id, from_msisdn, to_msisdn, ts, text, created_at FROM messages",
        );
        push_filters(&mut rows_query, filter);
        rows_query
            .push(" ORDER BY ts ASC, message_id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows: Vec<StoredMessage> = rows_query.build_query_as().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        Ok(MessagePage { rows, total })
    }

    /// Aggregates over the whole store, computed from one snapshot.
    pub async fn stats(&self) -> Result<MessageStats> {
        let start = Instant::now();
        let result = self.stats_in_snapshot().await;
        observe("stats", start, &result);
        result.map_err(|e| {
            error!(error = %e, "Failed to compute message stats");
            e.into()
        })
    }

    async fn stats_in_snapshot(&self) -> std::result::Result<MessageStats, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let (total_messages, senders_count, first_message_ts, last_message_ts): (
            i64,
            i64,
            Option<String>,
            Option<String>,
        ) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT from_msisdn), MIN(ts), MAX(ts) FROM messages",
        )
        .fetch_one(&mut *tx)
        .await?;

        // Ties on count are broken by sender so the ranking is deterministic.
        let messages_per_sender: Vec<SenderCount> = sqlx::query_as(
            r#"
            SELECT from_msisdn, COUNT(*) AS count
            FROM messages
            GROUP BY from_msisdn
            ORDER BY count DESC, from_msisdn ASC
            LIMIT ?
            "#,
        )
        .bind(TOP_SENDERS_LIMIT)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MessageStats {
            total_messages,
            senders_count,
            messages_per_sender,
            first_message_ts,
            last_message_ts,
        })
    }
}

fn push_filters<'args>(query: &mut QueryBuilder<'args, Sqlite>, filter: &'args MessageFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(from) = filter.from.as_deref() {
        query.push(" AND from_msisdn = ").push_bind(from);
    }
    if let Some(since) = filter.since.as_deref() {
        query.push(" AND ts >= ").push_bind(since);
    }
    if let Some(q) = filter.q.as_deref() {
        // instr() instead of LIKE so '%' and '_' in the search term are literal.
        query
            .push(" AND instr(text_lower, ")
            .push_bind(q.to_lowercase())
            .push(") > 0");
    }
}

fn observe<T>(query: &str, start: Instant, result: &std::result::Result<T, sqlx::Error>) {
    record_db_query(query, start.elapsed().as_secs_f64(), result.is_ok());
}
