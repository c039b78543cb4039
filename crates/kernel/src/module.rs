use async_trait::async_trait;
use axum::Router;
use stacks_db::{Database, Migration};

use crate::settings::Settings;

/// What a module sees while the application boots.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
    /// Already migrated by the time `init` runs
    pub db: &'a Database,
}

/// A domain area of the service (authors, books, borrows).
///
/// A module owns its tables, contributes routes and an OpenAPI fragment,
/// and takes part in the boot and shutdown sequence:
/// `migrations` → `init` → `start` → serve → `stop`.
#[async_trait]
pub trait Module: Sync + Send {
    /// Stable identifier; also keys the module's rows in `schema_migrations`.
    fn name(&self) -> &'static str;

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes with absolute paths, merged at the application root.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// `paths` and `components` to fold into the service document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema changes for the module's tables, applied by id order.
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called in reverse registration order during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
