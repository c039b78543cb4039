//! Connection pool factory.

use std::str::FromStr;
use std::time::{Duration, Instant};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::error::DbResult;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the SQLite pool. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url`.
    ///
    /// Connections enforce foreign keys, use the WAL journal and wait up to
    /// five seconds for a competing writer before failing.
    pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
        let started_at = Instant::now();
        tracing::info!(url, max_connections, "opening database");

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .inspect_err(|err| tracing::error!(url, error = %err, "failed to open database"))?;

        tracing::info!(
            url,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "database ready"
        );
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds exactly one connection that never expires, since an
    /// in-memory database disappears with the connection that created it.
    pub async fn connect_in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::debug!("in-memory database ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Round-trip a trivial query to confirm the pool is usable.
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_answers_ping() {
        let db = Database::connect_in_memory().await.unwrap();
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn file_database_is_created_on_connect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stacks.db");
        let url = format!("sqlite://{}", path.display());

        let db = Database::connect(&url, 2).await.unwrap();
        db.ping().await.unwrap();
        db.close().await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::connect_in_memory().await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
