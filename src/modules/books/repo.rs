//! SQL for the `books` table.
//!
//! `available_copies` is written in exactly two places, [`take_copy`] and
//! [`restore_copy`], both driven by the borrow ledger.

use stacks_db::{Database, DbError, SqliteExecutor};

use super::models::{Book, BookPatch, NewBook};
use crate::error::{LibraryError, LibraryResult};
use crate::modules::borrows;

pub(crate) const MIGRATION_001: &str = r#"
    CREATE TABLE books (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        title            TEXT NOT NULL,
        description      TEXT,
        author_id        INTEGER NOT NULL REFERENCES authors (id),
        available_copies INTEGER NOT NULL DEFAULT 0 CHECK (available_copies >= 0),
        UNIQUE (title, author_id)
    );
    CREATE INDEX books_author_id ON books (author_id);
"#;

pub async fn find<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> LibraryResult<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, title, description, author_id, available_copies FROM books WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(book)
}

/// Equality lookup on `(title, author_id)`.
pub async fn find_by_title_and_author<'e, E: SqliteExecutor<'e>>(
    executor: E,
    title: &str,
    author_id: i64,
) -> LibraryResult<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, title, description, author_id, available_copies FROM books \
         WHERE title = ? AND author_id = ?",
    )
    .bind(title)
    .bind(author_id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(book)
}

pub async fn list(db: &Database) -> LibraryResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, title, description, author_id, available_copies FROM books ORDER BY id",
    )
    .fetch_all(db.pool())
    .await
    .map_err(DbError::from)?;
    Ok(books)
}

/// Insert a book for an existing author.
///
/// The author check and the insert are one statement, so a missing author
/// persists nothing.
pub async fn create(db: &Database, new: NewBook) -> LibraryResult<Book> {
    let result = sqlx::query_as::<_, Book>(
        "INSERT INTO books (title, description, author_id, available_copies) \
         SELECT ?, ?, ?, ? WHERE EXISTS (SELECT 1 FROM authors WHERE id = ?) \
         RETURNING id, title, description, author_id, available_copies",
    )
    .bind(&new.title)
    .bind(new.description.as_deref())
    .bind(new.author_id)
    .bind(new.available_copies)
    .bind(new.author_id)
    .fetch_optional(db.pool())
    .await
    .map_err(DbError::from);

    match result {
        Ok(Some(book)) => {
            tracing::info!(
                book_id = book.id,
                author_id = book.author_id,
                available_copies = book.available_copies,
                "book created"
            );
            Ok(book)
        }
        Ok(None) => Err(LibraryError::not_found("author", new.author_id)),
        Err(err) if err.is_unique_violation() => {
            let existing = find_by_title_and_author(db.pool(), &new.title, new.author_id).await?;
            Err(LibraryError::Duplicate {
                entity: "book",
                existing_id: existing.map(|book| book.id),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Apply the supplied descriptive fields. Stock is left untouched.
pub async fn update(db: &Database, id: i64, patch: BookPatch) -> LibraryResult<Book> {
    let (set_description, description) = match patch.description {
        Some(description) => (true, description),
        None => (false, None),
    };

    let result = sqlx::query_as::<_, Book>(
        "UPDATE books SET \
             title = COALESCE(?, title), \
             description = CASE WHEN ? THEN ? ELSE description END \
         WHERE id = ? \
         RETURNING id, title, description, author_id, available_copies",
    )
    .bind(patch.title.as_deref())
    .bind(set_description)
    .bind(description.as_deref())
    .bind(id)
    .fetch_optional(db.pool())
    .await
    .map_err(DbError::from);

    match result {
        Ok(Some(book)) => {
            tracing::info!(book_id = id, "book updated");
            Ok(book)
        }
        Ok(None) => Err(LibraryError::not_found("book", id)),
        Err(err) if err.is_unique_violation() => Err(LibraryError::Duplicate {
            entity: "book",
            existing_id: None,
        }),
        Err(err) => Err(err.into()),
    }
}

/// Delete a book that no borrow has ever referenced. Borrow history is
/// never discarded.
pub async fn delete(db: &Database, id: i64) -> LibraryResult<()> {
    let deleted = sqlx::query(
        "DELETE FROM books WHERE id = ? \
         AND NOT EXISTS (SELECT 1 FROM borrows WHERE book_id = ?)",
    )
    .bind(id)
    .bind(id)
    .execute(db.pool())
    .await
    .map_err(DbError::from)?
    .rows_affected();

    if deleted == 1 {
        tracing::info!(book_id = id, "book deleted");
        return Ok(());
    }

    match find(db.pool(), id).await? {
        Some(_) => {
            let (borrows, outstanding) = borrows::repo::count_for_book(db.pool(), id).await?;
            tracing::warn!(
                book_id = id,
                borrows,
                outstanding,
                "refusing to delete book with borrow history"
            );
            Err(LibraryError::HasBorrows { book_id: id })
        }
        None => Err(LibraryError::not_found("book", id)),
    }
}

/// Take one copy off the shelf if any is left. Returns the remaining count,
/// or `None` when the book is missing or out of stock.
pub(crate) async fn take_copy<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
) -> LibraryResult<Option<i64>> {
    let remaining = sqlx::query_scalar::<_, i64>(
        "UPDATE books SET available_copies = available_copies - 1 \
         WHERE id = ? AND available_copies >= 1 \
         RETURNING available_copies",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(remaining)
}

/// Put one copy back. Returns the new count, or `None` when the book is gone.
pub(crate) async fn restore_copy<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
) -> LibraryResult<Option<i64>> {
    let available = sqlx::query_scalar::<_, i64>(
        "UPDATE books SET available_copies = available_copies + 1 \
         WHERE id = ? \
         RETURNING available_copies",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(available)
}
