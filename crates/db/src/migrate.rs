//! Migration runner.
//!
//! Modules contribute migrations identified by `(module, id)`. Applied
//! migrations are recorded in `schema_migrations`, so running the same set
//! twice is a no-op.

use time::OffsetDateTime;

use crate::error::{DbError, DbResult};
use crate::pool::Database;

const BOOKKEEPING_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL,
        PRIMARY KEY (module, id)
    );
"#;

/// Migration definition for modules
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

impl Database {
    /// Apply every migration not yet recorded, in the order given.
    ///
    /// Each migration runs in its own transaction together with its
    /// bookkeeping row. Returns how many were applied.
    pub async fn apply_migrations(&self, migrations: &[(String, Migration)]) -> DbResult<usize> {
        sqlx::raw_sql(BOOKKEEPING_DDL).execute(self.pool()).await?;

        let mut applied = 0;
        for (module, migration) in migrations {
            if self.is_applied(module, migration.id).await? {
                tracing::debug!(module, id = migration.id, "migration already applied");
                continue;
            }

            let mut tx = self.begin().await?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .map_err(|source| DbError::Migration {
                    module: module.clone(),
                    id: migration.id.to_string(),
                    source,
                })?;
            sqlx::query("INSERT INTO schema_migrations (module, id, applied_at) VALUES (?, ?, ?)")
                .bind(module)
                .bind(migration.id)
                .bind(OffsetDateTime::now_utc())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            tracing::info!(module, id = migration.id, "migration applied");
            applied += 1;
        }

        Ok(applied)
    }

    async fn is_applied(&self, module: &str, id: &str) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM schema_migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf_migrations() -> Vec<(String, Migration)> {
        vec![
            (
                "shelves".to_string(),
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE shelves (id INTEGER PRIMARY KEY, label TEXT NOT NULL);",
                },
            ),
            (
                "shelves".to_string(),
                Migration {
                    id: "002_floor",
                    up: "ALTER TABLE shelves ADD COLUMN floor INTEGER NOT NULL DEFAULT 0;",
                },
            ),
        ]
    }

    #[tokio::test]
    async fn applies_pending_migrations_once() {
        let db = Database::connect_in_memory().await.unwrap();

        assert_eq!(db.apply_migrations(&shelf_migrations()).await.unwrap(), 2);
        assert_eq!(db.apply_migrations(&shelf_migrations()).await.unwrap(), 0);

        sqlx::query("INSERT INTO shelves (label, floor) VALUES ('A', 2)")
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let db = Database::connect_in_memory().await.unwrap();
        let broken = vec![(
            "broken".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE oops (;",
            },
        )];

        let err = db.apply_migrations(&broken).await.unwrap_err();
        assert!(matches!(err, DbError::Migration { ref module, .. } if module == "broken"));

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(recorded, 0);
    }
}
