use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use stacks_db::Database;
use stacks_http::{AppError, ValidJson, ValidPath};

use super::models::{Author, AuthorPatch, NewAuthor};
use super::repo;
use crate::error::LibraryError;

pub fn router(db: Database) -> Router {
    Router::new()
        .route("/authors/", get(list_authors).post(create_author))
        .route("/authors", get(list_authors).post(create_author))
        .route("/authors/{id}", get(get_author).put(update_author))
        .with_state(db)
}

async fn create_author(
    State(db): State<Database>,
    ValidJson(payload): ValidJson<NewAuthor>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let author = repo::create(&db, payload.normalized()).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

async fn list_authors(State(db): State<Database>) -> Result<Json<Vec<Author>>, AppError> {
    Ok(Json(repo::list(&db).await?))
}

async fn get_author(
    State(db): State<Database>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Author>, AppError> {
    let author = repo::find(db.pool(), id)
        .await?
        .ok_or_else(|| LibraryError::not_found("author", id))?;
    Ok(Json(author))
}

async fn update_author(
    State(db): State<Database>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<AuthorPatch>,
) -> Result<Json<Author>, AppError> {
    Ok(Json(repo::update(&db, id, patch.normalized()).await?))
}
