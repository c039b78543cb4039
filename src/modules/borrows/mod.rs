pub mod lifecycle;
pub mod models;
pub mod repo;
mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use stacks_db::Database;
use stacks_kernel::{InitCtx, Migration, Module};

use lifecycle::BorrowLedger;

/// Borrows module: checkouts and returns of book copies
pub struct BorrowsModule {
    ledger: BorrowLedger,
}

impl BorrowsModule {
    pub fn new(db: Database) -> Self {
        Self {
            ledger: BorrowLedger::new(db),
        }
    }
}

#[async_trait]
impl Module for BorrowsModule {
    fn name(&self) -> &'static str {
        "borrows"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let borrows = self.ledger.list_borrows().await?;
        let outstanding = borrows
            .iter()
            .filter(|borrow| borrow.state() == models::BorrowState::Outstanding)
            .count();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            total = borrows.len(),
            outstanding,
            "borrows module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.ledger.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
            })
        };
        let borrow = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Borrow" } } }
            })
        };
        let id_parameter = json!({
            "name": "id", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" }
        });

        Some(json!({
            "paths": {
                "/borrows/": {
                    "get": {
                        "summary": "List borrows",
                        "tags": ["Borrows"],
                        "responses": {
                            "200": {
                                "description": "All borrows ordered by id",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Borrow" } }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Borrow one copy of a book",
                        "tags": ["Borrows"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewBorrow" } } }
                        },
                        "responses": {
                            "201": borrow("Borrow created; one copy taken"),
                            "400": error("No available copies"),
                            "404": error("Book not found"),
                            "422": error("Validation error")
                        }
                    }
                },
                "/borrows/{id}": {
                    "parameters": [id_parameter.clone()],
                    "get": {
                        "summary": "Get a borrow",
                        "tags": ["Borrows"],
                        "responses": {
                            "200": borrow("The borrow"),
                            "404": error("Borrow not found")
                        }
                    }
                },
                "/borrows/{id}/return": {
                    "parameters": [id_parameter],
                    "patch": {
                        "summary": "Return a borrowed copy",
                        "tags": ["Borrows"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ReturnBorrow" } } }
                        },
                        "responses": {
                            "200": borrow("Borrow closed; one copy restored"),
                            "400": error("Borrow already returned"),
                            "404": error("Borrow or book not found"),
                            "422": error("Validation error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Borrow": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "book_id": { "type": "integer", "format": "int64" },
                            "reader_name": { "type": "string" },
                            "borrow_date": { "type": "string", "format": "date-time" },
                            "return_date": { "type": ["string", "null"], "format": "date-time" }
                        },
                        "required": ["id", "book_id", "reader_name", "borrow_date", "return_date"]
                    },
                    "NewBorrow": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "integer", "format": "int64" },
                            "reader_name": { "type": "string" }
                        },
                        "required": ["book_id", "reader_name"]
                    },
                    "ReturnBorrow": {
                        "type": "object",
                        "properties": {
                            "return_date": {
                                "type": "string",
                                "description": "RFC 3339 timestamp, or YYYY-MM-DD for midnight UTC"
                            }
                        },
                        "required": ["return_date"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: repo::MIGRATION_001,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "borrows module stopped");
        Ok(())
    }
}

/// Create a new instance of the borrows module
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BorrowsModule::new(db))
}
