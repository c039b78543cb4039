pub mod models;
pub mod repo;
mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use stacks_db::Database;
use stacks_kernel::{InitCtx, Migration, Module};

/// Books module: the catalogue and its per-title stock
pub struct BooksModule {
    db: Database,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = repo::list(ctx.db).await?;
        let on_shelf: i64 = books.iter().map(|book| book.available_copies).sum();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            titles = books.len(),
            on_shelf,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
            })
        };
        let book = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
            })
        };

        Some(json!({
            "paths": {
                "/books/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books ordered by id",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book for an existing author",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewBook" } } }
                        },
                        "responses": {
                            "201": book("Book created"),
                            "404": error("Author not found"),
                            "409": error("The author already has a book with this title"),
                            "422": error("Validation error")
                        }
                    }
                },
                "/books/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
                    ],
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": book("The book"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Partially update a book's title or description",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BookPatch" } } }
                        },
                        "responses": {
                            "200": book("The updated book"),
                            "404": error("Book not found"),
                            "409": error("The author already has a book with this title"),
                            "422": error("Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book that has never been borrowed",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "404": error("Book not found"),
                            "409": error("The book has borrow records")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "description": { "type": ["string", "null"] },
                            "author_id": { "type": "integer", "format": "int64" },
                            "available_copies": { "type": "integer", "format": "int64", "minimum": 0 }
                        },
                        "required": ["id", "title", "author_id", "available_copies"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": ["string", "null"] },
                            "author_id": { "type": "integer", "format": "int64" },
                            "available_copies": { "type": "integer", "format": "int64", "minimum": 0, "default": 0 }
                        },
                        "required": ["title", "author_id"]
                    },
                    "BookPatch": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": ["string", "null"] }
                        },
                        "additionalProperties": false
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
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}
