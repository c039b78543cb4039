use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use stacks_http::{AppError, ValidJson, ValidPath};

use super::lifecycle::BorrowLedger;
use super::models::{Borrow, NewBorrow, ReturnBorrow};

pub fn router(ledger: BorrowLedger) -> Router {
    Router::new()
        .route("/borrows/", get(list_borrows).post(create_borrow))
        .route("/borrows", get(list_borrows).post(create_borrow))
        .route("/borrows/{id}", get(get_borrow))
        .route("/borrows/{id}/return", patch(return_borrow))
        .with_state(ledger)
}

async fn create_borrow(
    State(ledger): State<BorrowLedger>,
    ValidJson(payload): ValidJson<NewBorrow>,
) -> Result<(StatusCode, Json<Borrow>), AppError> {
    let borrow = ledger
        .create_borrow(payload.book_id, &payload.reader_name)
        .await?;
    Ok((StatusCode::CREATED, Json(borrow)))
}

async fn list_borrows(State(ledger): State<BorrowLedger>) -> Result<Json<Vec<Borrow>>, AppError> {
    Ok(Json(ledger.list_borrows().await?))
}

async fn get_borrow(
    State(ledger): State<BorrowLedger>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Borrow>, AppError> {
    Ok(Json(ledger.get_borrow(id).await?))
}

async fn return_borrow(
    State(ledger): State<BorrowLedger>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<ReturnBorrow>,
) -> Result<Json<Borrow>, AppError> {
    Ok(Json(ledger.return_borrow(id, payload.return_date).await?))
}
