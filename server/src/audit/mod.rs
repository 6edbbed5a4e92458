//! Audit Log
//!
//! Best-effort, append-only record of inbound events and unmatched
//! messages. A failed write is reported and swallowed; it never blocks or
//! fails the reply path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// One appended audit record. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Participant label: a bare user id or a `user:`/`group:`/`room:`
    /// source label.
    pub line_id: String,
    /// Logged message body.
    pub message: String,
    /// Stamped when the record is built.
    pub created_at: DateTime<Utc>,
}

impl LogRecord {
    /// Build a record stamped with the current time.
    #[must_use]
    pub fn new(line_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line_id: line_id.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only sink for audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one record.
    async fn append(&self, record: LogRecord) -> anyhow::Result<()>;
}

/// Postgres-backed audit sink writing to `line_logs`.
#[derive(Debug, Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn append(&self, record: LogRecord) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO line_logs (line_id, message, created_at) VALUES ($1, $2, $3)")
            .bind(&record.line_id)
            .bind(&record.message)
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
