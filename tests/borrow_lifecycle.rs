use stacks_app::app::Application;
use stacks_app::modules::authors::{self, models::NewAuthor};
use stacks_app::modules::books::{self, models::NewBook};
use stacks_app::{BorrowLedger, LibraryError};
use stacks_db::Database;
use stacks_kernel::settings::Settings;
use time::macros::{date, datetime};

async fn assembled() -> Application {
    let db = Database::connect_in_memory().await.unwrap();
    Application::assemble(db, &Settings::default()).await.unwrap()
}

#[tokio::test]
async fn jane_doe_scenario() {
    let app = assembled().await;
    let db = &app.db;
    let ledger = BorrowLedger::new(db.clone());

    let author = authors::repo::create(
        db,
        NewAuthor {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            birth_date: date!(1970 - 01 - 01),
        },
    )
    .await
    .unwrap();
    assert_eq!(author.id, 1);

    let book = books::repo::create(
        db,
        NewBook {
            title: "Go".to_string(),
            description: None,
            author_id: author.id,
            available_copies: 1,
        },
    )
    .await
    .unwrap();
    assert_eq!(book.id, 1);

    let borrow = ledger.create_borrow(book.id, "Sam").await.unwrap();
    assert_eq!(borrow.id, 1);
    assert!(borrow.return_date.is_none());
    let stocked = books::repo::find(db.pool(), book.id).await.unwrap().unwrap();
    assert_eq!(stocked.available_copies, 0);

    let err = ledger.create_borrow(book.id, "Alex").await.unwrap_err();
    assert!(matches!(err, LibraryError::CapacityExhausted { book_id: 1 }));

    let returned = ledger
        .return_borrow(borrow.id, datetime!(2024-01-01 0:00 UTC))
        .await
        .unwrap();
    assert_eq!(returned.return_date, Some(datetime!(2024-01-01 0:00 UTC)));
    let stocked = books::repo::find(db.pool(), book.id).await.unwrap().unwrap();
    assert_eq!(stocked.available_copies, 1);

    let err = ledger
        .return_borrow(borrow.id, datetime!(2024-01-05 0:00 UTC))
        .await
        .unwrap_err();
    assert!(matches!(err, LibraryError::AlreadyReturned { borrow_id: 1 }));
    let stocked = books::repo::find(db.pool(), book.id).await.unwrap().unwrap();
    assert_eq!(stocked.available_copies, 1);
}

#[tokio::test]
async fn borrow_then_return_restores_stock() {
    let app = assembled().await;
    let db = &app.db;
    let ledger = BorrowLedger::new(db.clone());

    let author = authors::repo::create(
        db,
        NewAuthor {
            first_name: "Italo".to_string(),
            last_name: "Calvino".to_string(),
            birth_date: date!(1923 - 10 - 15),
        },
    )
    .await
    .unwrap();
    let book = books::repo::create(
        db,
        NewBook {
            title: "Invisible Cities".to_string(),
            description: Some("Marco Polo describes cities".to_string()),
            author_id: author.id,
            available_copies: 4,
        },
    )
    .await
    .unwrap();

    let mut borrows = Vec::new();
    for reader in ["Kublai", "Marco"] {
        borrows.push(ledger.create_borrow(book.id, reader).await.unwrap());
    }
    let stocked = books::repo::find(db.pool(), book.id).await.unwrap().unwrap();
    assert_eq!(stocked.available_copies, 2);

    for borrow in &borrows {
        ledger
            .return_borrow(borrow.id, datetime!(2024-06-01 12:00 UTC))
            .await
            .unwrap();
    }
    let stocked = books::repo::find(db.pool(), book.id).await.unwrap().unwrap();
    assert_eq!(stocked.available_copies, 4);
}

#[tokio::test]
async fn reassembling_applies_no_migrations() {
    let app = assembled().await;
    let applied = app.registry.migrate(&app.db).await.unwrap();
    assert_eq!(applied, 0);
}
