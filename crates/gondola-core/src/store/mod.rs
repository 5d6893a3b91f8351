//! libSQL-backed persistence for audits and their items.
//!
//! The database lives in a single local file (or `:memory:` in tests).
//! Migrations are embedded and re-run on every open, every statement in
//! them is idempotent.

pub mod helpers;

mod audits;

use libsql::Builder;
use thiserror::Error;

const MIGRATION_001: &str = include_str!("../../migrations/001_initial.sql");

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("no result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

/// Central database handle. All audit persistence goes through here.
pub struct AuditStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl AuditStore {
    /// Open a local database at the given path, running migrations.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are off by default and must be enabled per connection.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        conn.execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_initial: {e}")))?;

        Ok(Self { db, conn })
    }

    /// In-memory database for tests.
    pub async fn open_memory() -> Result<Self, StoreError> {
        Self::open_local(":memory:").await
    }

    pub(crate) fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
