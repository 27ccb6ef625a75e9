//! # Client Log Repository
//!
//! Stores error reports from the browser dashboard. Reports are deduplicated
//! on `(level, source, message)`: a repeat touches `last_seen` and bumps
//! `occurrences` instead of growing the table.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, Statement};

use crate::db::Db;
use crate::error::RepositoryError;
use crate::models::LogEntry;
use crate::models::log_entry::{Column, Model as LogModel};
use crate::repositories::{now_timestamp, ph_list};

/// A client-submitted error report.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub level: String,
    pub source: String,
    pub message: String,
    pub stack: Option<String>,
    pub user_agent: Option<String>,
}

/// Repository for client error logs.
pub struct LogRepository<'a> {
    db: &'a Db,
}

impl<'a> LogRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Record a report, deduplicating against earlier identical ones.
    /// Returns the stored row, with `occurrences` reflecting the upsert.
    pub async fn record(&self, entry: NewLogEntry) -> Result<LogModel, RepositoryError> {
        self.validate(&entry)?;

        let now = now_timestamp();
        let b = self.db.backend();
        let sql = format!(
            "INSERT INTO logs \
                 (level, source, message, stack, user_agent, first_seen, last_seen, occurrences) \
             VALUES ({}, 1) \
             ON CONFLICT (level, source, message) \
             DO UPDATE SET last_seen = excluded.last_seen, \
                           occurrences = occurrences + 1",
            ph_list(b, 1, 7)
        );
        let stmt = Statement::from_sql_and_values(
            b,
            sql,
            [
                entry.level.as_str().into(),
                entry.source.as_str().into(),
                entry.message.as_str().into(),
                entry.stack.as_deref().into(),
                entry.user_agent.as_deref().into(),
                now.as_str().into(),
                now.as_str().into(),
            ],
        );
        self.db.timed(self.db.conn().execute(stmt)).await?;

        self.db
            .timed(
                LogEntry::find()
                    .filter(Column::Level.eq(entry.level.as_str()))
                    .filter(Column::Source.eq(entry.source.as_str()))
                    .filter(Column::Message.eq(entry.message.as_str()))
                    .one(self.db.conn()),
            )
            .await?
            .ok_or_else(|| RepositoryError::not_found("log entry".to_string()))
    }

    /// All stored reports, most recently seen first.
    pub async fn list(&self) -> Result<Vec<LogModel>, RepositoryError> {
        self.db
            .timed(
                LogEntry::find()
                    .order_by(Column::LastSeen, Order::Desc)
                    .order_by(Column::Id, Order::Desc)
                    .all(self.db.conn()),
            )
            .await
    }

    fn validate(&self, entry: &NewLogEntry) -> Result<(), RepositoryError> {
        for (field, value) in [
            ("level", &entry.level),
            ("source", &entry.source),
            ("message", &entry.message),
        ] {
            if value.trim().is_empty() {
                return Err(RepositoryError::validation(format!(
                    "{field} is required and cannot be blank"
                )));
            }
        }
        Ok(())
    }
}
