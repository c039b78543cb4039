//! Borrow lifecycle: the only code that moves a book's available copies.
//!
//! # Invariants
//! - A borrow is created only by taking a copy; both commit in one
//!   transaction or neither does.
//! - A borrow is returned at most once, and returning puts exactly one copy
//!   back in the same transaction.
//! - `available_copies` never goes below zero: the check and the decrement
//!   are a single conditional `UPDATE`, serialized by SQLite's write lock.

use stacks_db::{Database, DbError};
use time::OffsetDateTime;

use super::models::{Borrow, BorrowState};
use super::repo;
use crate::error::{LibraryError, LibraryResult};
use crate::modules::books;

/// Handle over the database for borrow and return transitions.
#[derive(Debug, Clone)]
pub struct BorrowLedger {
    db: Database,
}

impl BorrowLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Check out one copy of `book_id` to `reader_name`.
    ///
    /// Fails with `NotFound` when the book does not exist and with
    /// `CapacityExhausted` when no copy is left; neither failure changes
    /// anything.
    pub async fn create_borrow(&self, book_id: i64, reader_name: &str) -> LibraryResult<Borrow> {
        let mut tx = self.db.begin().await?;

        let Some(remaining) = books::repo::take_copy(&mut *tx, book_id).await? else {
            return match books::repo::find(&mut *tx, book_id).await? {
                None => Err(LibraryError::not_found("book", book_id)),
                Some(_) => {
                    tracing::info!(book_id, "borrow refused: no copies available");
                    Err(LibraryError::CapacityExhausted { book_id })
                }
            };
        };

        let borrow = repo::insert(&mut *tx, book_id, reader_name, OffsetDateTime::now_utc()).await?;
        tx.commit().await.map_err(DbError::from)?;

        tracing::info!(borrow_id = borrow.id, book_id, remaining, "book borrowed");
        Ok(borrow)
    }

    /// Close an outstanding borrow with the caller's `return_date`.
    ///
    /// Fails with `NotFound` for an unknown borrow, `AlreadyReturned` for a
    /// borrow that is closed, and `NotFound` for the book when it vanished
    /// underneath the borrow.
    pub async fn return_borrow(
        &self,
        borrow_id: i64,
        return_date: OffsetDateTime,
    ) -> LibraryResult<Borrow> {
        let mut tx = self.db.begin().await?;

        let Some(borrow) = repo::mark_returned(&mut *tx, borrow_id, return_date).await? else {
            return match repo::find(&mut *tx, borrow_id).await? {
                None => Err(LibraryError::not_found("borrow", borrow_id)),
                Some(existing) => {
                    debug_assert_eq!(existing.state(), BorrowState::Returned);
                    tracing::info!(borrow_id, "return refused: already returned");
                    Err(LibraryError::AlreadyReturned { borrow_id })
                }
            };
        };

        let Some(available) = books::repo::restore_copy(&mut *tx, borrow.book_id).await? else {
            tracing::error!(
                borrow_id,
                book_id = borrow.book_id,
                "borrow references a book that no longer exists"
            );
            return Err(LibraryError::not_found("book", borrow.book_id));
        };

        tx.commit().await.map_err(DbError::from)?;

        if return_date < borrow.borrow_date {
            tracing::warn!(
                borrow_id,
                borrow_date = %borrow.borrow_date,
                return_date = %return_date,
                "return date precedes borrow date"
            );
        }
        tracing::info!(borrow_id, book_id = borrow.book_id, available, "book returned");
        Ok(borrow)
    }

    pub async fn get_borrow(&self, borrow_id: i64) -> LibraryResult<Borrow> {
        repo::find(self.db.pool(), borrow_id)
            .await?
            .ok_or_else(|| LibraryError::not_found("borrow", borrow_id))
    }

    pub async fn list_borrows(&self) -> LibraryResult<Vec<Borrow>> {
        repo::list(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::{self, models::NewAuthor};
    use crate::modules::books::models::NewBook;
    use crate::modules::borrows;
    use stacks_kernel::ModuleRegistry;
    use time::macros::{date, datetime};

    async fn ledger_with_book(copies: i64) -> (BorrowLedger, Database, i64) {
        let db = Database::connect_in_memory().await.unwrap();
        let mut registry = ModuleRegistry::new();
        registry.register(authors::create_module(db.clone()));
        registry.register(books::create_module(db.clone()));
        registry.register(borrows::create_module(db.clone()));
        registry.migrate(&db).await.unwrap();

        let author = authors::repo::create(
            &db,
            NewAuthor {
                first_name: "Ursula".to_string(),
                last_name: "Le Guin".to_string(),
                birth_date: date!(1929 - 10 - 21),
            },
        )
        .await
        .unwrap();
        let book = books::repo::create(
            &db,
            NewBook {
                title: "The Dispossessed".to_string(),
                description: None,
                author_id: author.id,
                available_copies: copies,
            },
        )
        .await
        .unwrap();

        (BorrowLedger::new(db.clone()), db, book.id)
    }

    async fn copies(db: &Database, book_id: i64) -> i64 {
        books::repo::find(db.pool(), book_id)
            .await
            .unwrap()
            .unwrap()
            .available_copies
    }

    #[tokio::test]
    async fn borrowing_takes_one_copy() {
        let (ledger, db, book_id) = ledger_with_book(3).await;

        let borrow = ledger.create_borrow(book_id, "Shevek").await.unwrap();

        assert_eq!(borrow.state(), BorrowState::Outstanding);
        assert_eq!(borrow.reader_name, "Shevek");
        assert_eq!(copies(&db, book_id).await, 2);
    }

    #[tokio::test]
    async fn empty_shelf_refuses_without_side_effects() {
        let (ledger, db, book_id) = ledger_with_book(0).await;

        let err = ledger.create_borrow(book_id, "Takver").await.unwrap_err();

        assert!(matches!(err, LibraryError::CapacityExhausted { book_id: id } if id == book_id));
        assert_eq!(copies(&db, book_id).await, 0);
        assert!(ledger.list_borrows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_book_is_not_found() {
        let (ledger, _db, _) = ledger_with_book(1).await;
        let err = ledger.create_borrow(404, "Bedap").await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { entity: "book", id: 404 }));
    }

    #[tokio::test]
    async fn return_restores_the_copy_exactly_once() {
        let (ledger, db, book_id) = ledger_with_book(1).await;
        let borrow = ledger.create_borrow(book_id, "Shevek").await.unwrap();
        assert_eq!(copies(&db, book_id).await, 0);

        let returned_at = datetime!(2024-01-01 0:00 UTC);
        let returned = ledger.return_borrow(borrow.id, returned_at).await.unwrap();
        assert_eq!(returned.return_date, Some(returned_at));
        assert_eq!(returned.state(), BorrowState::Returned);
        assert_eq!(copies(&db, book_id).await, 1);

        let err = ledger
            .return_borrow(borrow.id, datetime!(2024-02-01 0:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::AlreadyReturned { borrow_id } if borrow_id == borrow.id));
        assert_eq!(copies(&db, book_id).await, 1);
        assert_eq!(
            ledger.get_borrow(borrow.id).await.unwrap().return_date,
            Some(returned_at)
        );
    }

    #[tokio::test]
    async fn unknown_borrow_cannot_be_returned() {
        let (ledger, _db, _) = ledger_with_book(1).await;
        let err = ledger
            .return_borrow(77, datetime!(2024-01-01 0:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { entity: "borrow", id: 77 }));
    }

    #[tokio::test]
    async fn return_against_vanished_book_rolls_back() {
        let (ledger, db, book_id) = ledger_with_book(1).await;
        let borrow = ledger.create_borrow(book_id, "Shevek").await.unwrap();

        // Simulate an out-of-band delete that bypassed the guard.
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(book_id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = ledger
            .return_borrow(borrow.id, datetime!(2024-01-01 0:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { entity: "book", .. }));
        assert_eq!(
            ledger.get_borrow(borrow.id).await.unwrap().state(),
            BorrowState::Outstanding
        );
    }
}
