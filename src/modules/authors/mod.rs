pub mod models;
pub mod repo;
mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use stacks_db::Database;
use stacks_kernel::{InitCtx, Migration, Module};

/// Authors: create, list, fetch and partially update.
pub struct AuthorsModule {
    db: Database,
}

impl AuthorsModule {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let known = repo::list(ctx.db).await?.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            known,
            "authors module initialized"
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
        let author = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Author" } } }
            })
        };

        Some(json!({
            "paths": {
                "/authors/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors ordered by id",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Author" } }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewAuthor" } } }
                        },
                        "responses": {
                            "201": author("Author created"),
                            "409": error("An author with the same name and birth date exists"),
                            "422": error("Validation error")
                        }
                    }
                },
                "/authors/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
                    ],
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "responses": {
                            "200": author("The author"),
                            "404": error("Author not found")
                        }
                    },
                    "put": {
                        "summary": "Partially update an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthorPatch" } } }
                        },
                        "responses": {
                            "200": author("The updated author"),
                            "404": error("Author not found"),
                            "409": error("Update collides with another author"),
                            "422": error("Validation error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "birth_date": { "type": "string", "format": "date" }
                        },
                        "required": ["id", "first_name", "last_name", "birth_date"]
                    },
                    "NewAuthor": {
                        "type": "object",
                        "properties": {
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "birth_date": { "type": "string", "format": "date" }
                        },
                        "required": ["first_name", "last_name", "birth_date"]
                    },
                    "AuthorPatch": {
                        "type": "object",
                        "properties": {
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "birth_date": { "type": "string", "format": "date" }
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
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(db))
}
