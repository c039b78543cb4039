//! Storage error types.

use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("migration {module}/{id} failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Whether the failure came from a `UNIQUE` constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlx(err) => err
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation()),
            Self::Migration { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        let error = DbError::from(sqlx::Error::RowNotFound);
        assert!(!error.is_unique_violation());
    }

    #[test]
    fn migration_error_names_module_and_id() {
        let error = DbError::Migration {
            module: "books".to_string(),
            id: "001_init".to_string(),
            source: sqlx::Error::PoolClosed,
        };
        assert!(error.to_string().starts_with("migration books/001_init failed"));
    }
}
