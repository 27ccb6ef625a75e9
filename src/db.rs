//! Persistence gateway for the gridportal API.
//!
//! Owns the SeaORM connection pool (Postgres in production, SQLite in tests)
//! and the bounded per-query execution contract: every statement issued by a
//! repository runs through [`Db::timed`], which enforces the configured query
//! timeout and classifies driver errors into the domain taxonomy. Raw
//! `DbErr`s never cross this boundary.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend};
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::error::RepositoryError;

/// Errors that can occur while bringing up the database pool.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: sea_orm::DbErr,
    },
    #[error("invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Shared handle over the connection pool plus the query-time bound.
///
/// The bound covers the whole operation handed to [`Db::timed`], pool
/// acquisition included; a saturated pool that holds a statement past the
/// bound surfaces as `QueryTimeout` like any other slow query. Acquisition
/// alone is bounded tighter by `db_acquire_timeout_ms`.
#[derive(Debug, Clone)]
pub struct Db {
    conn: DatabaseConnection,
    query_timeout_ms: u64,
}

impl Db {
    pub fn new(conn: DatabaseConnection, query_timeout_ms: u64) -> Self {
        Self {
            conn,
            query_timeout_ms,
        }
    }

    /// The underlying pool, for building SeaORM queries.
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }

    /// The query bound in whole seconds, as reported to clients.
    pub fn query_timeout_seconds(&self) -> u64 {
        self.query_timeout_ms.div_ceil(1_000).max(1)
    }

    /// Run one database operation under the configured query timeout.
    ///
    /// Exceeding the bound yields `RepositoryError::QueryTimeout` carrying
    /// the configured duration; other failures are classified by
    /// [`RepositoryError::from_db_err`].
    pub async fn timed<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, sea_orm::DbErr>>,
    {
        let started = Instant::now();
        let outcome = tokio::time::timeout(Duration::from_millis(self.query_timeout_ms), operation)
            .await;
        histogram!("gridportal_query_duration_seconds").record(started.elapsed().as_secs_f64());

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                counter!("gridportal_query_errors_total").increment(1);
                Err(RepositoryError::from_db_err(err))
            }
            Err(_elapsed) => {
                counter!("gridportal_query_timeouts_total").increment(1);
                Err(RepositoryError::QueryTimeout {
                    seconds: self.query_timeout_seconds(),
                })
            }
        }
    }
}

/// Initializes the connection pool with retry and exponential backoff for
/// transient startup errors.
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "database URL cannot be empty".to_string(),
        }
        .into());
    }

    let mut opt = ConnectOptions::new(&cfg.database_url);
    opt.max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let max_retries = 5;
    let mut retry_delay = Duration::from_millis(100);

    for attempt in 1..=max_retries {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                tracing::info!(attempt, "connected to database");
                return Ok(conn);
            }
            Err(e) if attempt == max_retries => {
                tracing::error!(
                    attempts = max_retries,
                    error = %e,
                    "giving up connecting to database"
                );
                return Err(DatabaseError::ConnectionFailed { source: e }.into());
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, delay = ?retry_delay, "database connection failed, retrying");
                sleep(retry_delay).await;
                retry_delay *= 2;
            }
        }
    }

    unreachable!("connection loop either returns a pool or an error")
}

/// Verify the pool can execute a trivial statement.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    use sea_orm::Statement;

    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    db.query_one(stmt)
        .await
        .context("database health check failed")?;

    Ok(())
}
