use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use stacks_db::Database;
use stacks_http::{AppError, ValidJson, ValidPath};

use super::models::{Book, BookPatch, NewBook};
use super::repo;
use crate::error::LibraryError;

pub fn router(db: Database) -> Router {
    Router::new()
        .route("/books/", get(list_books).post(create_book))
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(db)
}

async fn create_book(
    State(db): State<Database>,
    ValidJson(payload): ValidJson<NewBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = repo::create(&db, payload.normalized()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(State(db): State<Database>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(repo::list(&db).await?))
}

async fn get_book(
    State(db): State<Database>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Book>, AppError> {
    let book = repo::find(db.pool(), id)
        .await?
        .ok_or_else(|| LibraryError::not_found("book", id))?;
    Ok(Json(book))
}

async fn update_book(
    State(db): State<Database>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<BookPatch>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(repo::update(&db, id, patch.normalized()).await?))
}

async fn delete_book(
    State(db): State<Database>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    repo::delete(&db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
