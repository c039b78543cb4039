//! SQL for the `authors` table.

use stacks_db::{Database, DbError, SqliteExecutor};
use time::Date;

use super::models::{Author, AuthorPatch, NewAuthor};
use crate::error::{LibraryError, LibraryResult};

pub(crate) const MIGRATION_001: &str = r#"
    CREATE TABLE authors (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name  TEXT NOT NULL,
        birth_date TEXT NOT NULL,
        UNIQUE (first_name, last_name, birth_date)
    );
"#;

pub async fn find<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> LibraryResult<Option<Author>> {
    let author = sqlx::query_as::<_, Author>(
        "SELECT id, first_name, last_name, birth_date FROM authors WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(author)
}

/// Equality lookup on the identifying triple.
pub async fn find_by_identity<'e, E: SqliteExecutor<'e>>(
    executor: E,
    first_name: &str,
    last_name: &str,
    birth_date: Date,
) -> LibraryResult<Option<Author>> {
    let author = sqlx::query_as::<_, Author>(
        "SELECT id, first_name, last_name, birth_date FROM authors \
         WHERE first_name = ? AND last_name = ? AND birth_date = ?",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(birth_date)
    .fetch_optional(executor)
    .await
    .map_err(DbError::from)?;
    Ok(author)
}

pub async fn list(db: &Database) -> LibraryResult<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>(
        "SELECT id, first_name, last_name, birth_date FROM authors ORDER BY id",
    )
    .fetch_all(db.pool())
    .await
    .map_err(DbError::from)?;
    Ok(authors)
}

/// Insert an author; an identical triple yields `Duplicate`.
pub async fn create(db: &Database, new: NewAuthor) -> LibraryResult<Author> {
    let result = sqlx::query_as::<_, Author>(
        "INSERT INTO authors (first_name, last_name, birth_date) VALUES (?, ?, ?) \
         RETURNING id, first_name, last_name, birth_date",
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.birth_date)
    .fetch_one(db.pool())
    .await
    .map_err(DbError::from);

    match result {
        Ok(author) => {
            tracing::info!(author_id = author.id, "author created");
            Ok(author)
        }
        Err(err) if err.is_unique_violation() => {
            let existing =
                find_by_identity(db.pool(), &new.first_name, &new.last_name, new.birth_date)
                    .await?;
            Err(LibraryError::Duplicate {
                entity: "author",
                existing_id: existing.map(|author| author.id),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Apply the supplied fields only. Colliding with another author yields
/// `Duplicate`.
pub async fn update(db: &Database, id: i64, patch: AuthorPatch) -> LibraryResult<Author> {
    let result = sqlx::query_as::<_, Author>(
        "UPDATE authors SET \
             first_name = COALESCE(?, first_name), \
             last_name = COALESCE(?, last_name), \
             birth_date = COALESCE(?, birth_date) \
         WHERE id = ? \
         RETURNING id, first_name, last_name, birth_date",
    )
    .bind(patch.first_name.as_deref())
    .bind(patch.last_name.as_deref())
    .bind(patch.birth_date)
    .bind(id)
    .fetch_optional(db.pool())
    .await
    .map_err(DbError::from);

    match result {
        Ok(Some(author)) => {
            tracing::info!(author_id = id, "author updated");
            Ok(author)
        }
        Ok(None) => Err(LibraryError::not_found("author", id)),
        Err(err) if err.is_unique_violation() => Err(LibraryError::Duplicate {
            entity: "author",
            existing_id: None,
        }),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::create_module;
    use stacks_kernel::ModuleRegistry;
    use time::macros::date;

    async fn setup() -> Database {
        let db = Database::connect_in_memory().await.unwrap();
        let mut registry = ModuleRegistry::new();
        registry.register(create_module(db.clone()));
        registry.migrate(&db).await.unwrap();
        db
    }

    fn jane() -> NewAuthor {
        NewAuthor {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            birth_date: date!(1970 - 01 - 01),
        }
    }

    #[tokio::test]
    async fn identical_author_is_duplicate() {
        let db = setup().await;
        let first = create(&db, jane()).await.unwrap();
        assert_eq!(first.id, 1);

        let err = create(&db, jane()).await.unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Duplicate { existing_id: Some(1), .. }
        ));
        assert_eq!(list(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn differing_in_one_field_is_allowed() {
        let db = setup().await;
        create(&db, jane()).await.unwrap();

        let other_first = NewAuthor { first_name: "John".to_string(), ..jane() };
        let other_last = NewAuthor { last_name: "Roe".to_string(), ..jane() };
        let other_date = NewAuthor { birth_date: date!(1971 - 01 - 01), ..jane() };

        for author in [other_first, other_last, other_date] {
            create(&db, author).await.unwrap();
        }
        assert_eq!(list(&db).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let db = setup().await;
        let author = create(&db, jane()).await.unwrap();

        let updated = update(
            &db,
            author.id,
            AuthorPatch {
                last_name: Some("Smith".to_string()),
                ..AuthorPatch::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.birth_date, date!(1970 - 01 - 01));
        assert_eq!(find(db.pool(), author.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_into_existing_identity_is_duplicate() {
        let db = setup().await;
        create(&db, jane()).await.unwrap();
        let john = create(&db, NewAuthor { first_name: "John".to_string(), ..jane() })
            .await
            .unwrap();

        let err = update(
            &db,
            john.id,
            AuthorPatch {
                first_name: Some("Jane".to_string()),
                ..AuthorPatch::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LibraryError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn missing_author_is_none_or_not_found() {
        let db = setup().await;
        assert_eq!(find(db.pool(), 42).await.unwrap(), None);

        let err = update(
            &db,
            42,
            AuthorPatch {
                first_name: Some("X".to_string()),
                ..AuthorPatch::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { entity: "author", id: 42 }));
    }
}
