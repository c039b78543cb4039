//! Domain errors and their HTTP mapping.

use serde_json::json;
use stacks_db::DbError;
use stacks_http::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} already exists")]
    Duplicate {
        entity: &'static str,
        existing_id: Option<i64>,
    },

    #[error("book {book_id} has no available copies")]
    CapacityExhausted { book_id: i64 },

    #[error("borrow {borrow_id} has already been returned")]
    AlreadyReturned { borrow_id: i64 },

    #[error("book {book_id} has borrow records")]
    HasBorrows { book_id: i64 },

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl LibraryError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        let message = err.to_string();
        match err {
            LibraryError::NotFound { .. } => AppError::not_found(message),
            LibraryError::Duplicate { existing_id, .. } => {
                let details = existing_id
                    .map(|id| vec![json!({ "existing_id": id })])
                    .unwrap_or_default();
                AppError::conflict(details, message).with_code("duplicate")
            }
            LibraryError::CapacityExhausted { .. } => {
                AppError::bad_request(message).with_code("capacity_exhausted")
            }
            LibraryError::AlreadyReturned { .. } => {
                AppError::bad_request(message).with_code("already_returned")
            }
            LibraryError::HasBorrows { .. } => {
                AppError::conflict(Vec::new(), message).with_code("book_has_borrows")
            }
            LibraryError::Storage(source) => AppError::Internal(source.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (LibraryError::not_found("book", 3), StatusCode::NOT_FOUND),
            (
                LibraryError::Duplicate {
                    entity: "author",
                    existing_id: Some(1),
                },
                StatusCode::CONFLICT,
            ),
            (
                LibraryError::CapacityExhausted { book_id: 1 },
                StatusCode::BAD_REQUEST,
            ),
            (
                LibraryError::AlreadyReturned { borrow_id: 1 },
                StatusCode::BAD_REQUEST,
            ),
            (
                LibraryError::HasBorrows { book_id: 1 },
                StatusCode::CONFLICT,
            ),
            (
                LibraryError::Storage(DbError::from(sqlx::Error::PoolClosed)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(LibraryError::not_found("borrow", 9).to_string(), "borrow 9 not found");
    }
}
