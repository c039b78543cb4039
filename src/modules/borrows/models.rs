use serde::{Deserialize, Serialize};
use stacks_http::Validate;
use time::OffsetDateTime;

/// Where a borrow is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowState {
    /// The copy is checked out
    Outstanding,
    /// The copy came back; terminal
    Returned,
}

/// One checkout of one copy of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Borrow {
    pub id: i64,
    pub book_id: i64,
    pub reader_name: String,
    #[serde(with = "crate::utils::timestamp")]
    pub borrow_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub return_date: Option<OffsetDateTime>,
}

impl Borrow {
    pub fn state(&self) -> BorrowState {
        match self.return_date {
            None => BorrowState::Outstanding,
            Some(_) => BorrowState::Returned,
        }
    }
}

/// Request model for checking out a copy.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBorrow {
    pub book_id: i64,
    /// Free text, stored as given
    pub reader_name: String,
}

impl Validate for NewBorrow {
    fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        Ok(())
    }
}

/// Request model for closing a borrow. The caller's timestamp is recorded
/// as given.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnBorrow {
    #[serde(with = "crate::utils::timestamp")]
    pub return_date: OffsetDateTime,
}

impl Validate for ReturnBorrow {
    fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        Ok(())
    }
}
