//! SQL for the `borrows` table.

use stacks_db::{Database, DbError, SqliteExecutor};
use time::OffsetDateTime;

use super::models::Borrow;
use crate::error::LibraryResult;

pub(crate) const MIGRATION_001: &str = r#"
    CREATE TABLE borrows (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id     INTEGER NOT NULL REFERENCES books (id),
        reader_name TEXT NOT NULL,
        borrow_date TEXT NOT NULL,
        return_date TEXT
    );
    CREATE INDEX borrows_outstanding ON borrows (book_id) WHERE return_date IS NULL;
"#;

pub async fn find<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> LibraryResult<Option<Borrow>> {
    let borrow = sqlx::query_as::<_, Borrow>(
        "SELECT id, book_id, reader_name, borrow_date, return_date FROM borrows WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(borrow)
}

pub async fn list(db: &Database) -> LibraryResult<Vec<Borrow>> {
    let borrows = sqlx::query_as::<_, Borrow>(
        "SELECT id, book_id, reader_name, borrow_date, return_date FROM borrows ORDER BY id",
    )
    .fetch_all(db.pool())
    .await
    .map_err(DbError::from)?;
    Ok(borrows)
}

pub(crate) async fn insert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    book_id: i64,
    reader_name: &str,
    borrow_date: OffsetDateTime,
) -> LibraryResult<Borrow> {
    let borrow = sqlx::query_as::<_, Borrow>(
        "INSERT INTO borrows (book_id, reader_name, borrow_date) VALUES (?, ?, ?) \
         RETURNING id, book_id, reader_name, borrow_date, return_date",
    )
    .bind(book_id)
    .bind(reader_name)
    .bind(borrow_date)
    .fetch_one(executor)
    .await
    .map_err(DbError::from)?;
    Ok(borrow)
}

/// Set `return_date` on an outstanding borrow. `None` when the borrow is
/// missing or already returned.
pub(crate) async fn mark_returned<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    return_date: OffsetDateTime,
) -> LibraryResult<Option<Borrow>> {
    let borrow = sqlx::query_as::<_, Borrow>(
        "UPDATE borrows SET return_date = ? WHERE id = ? AND return_date IS NULL \
         RETURNING id, book_id, reader_name, borrow_date, return_date",
    )
    .bind(return_date)
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(borrow)
}

/// All borrows of a book and how many of them are still outstanding.
pub async fn count_for_book<'e, E: SqliteExecutor<'e>>(
    executor: E,
    book_id: i64,
) -> LibraryResult<(i64, i64)> {
    let counts = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE return_date IS NULL) \
         FROM borrows WHERE book_id = ?",
    )
    .bind(book_id)
    .fetch_one(executor)
    .await
    .map_err(DbError::from)?;
    Ok(counts)
}
