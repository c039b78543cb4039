//! Application bootstrap: database, modules, migrations, HTTP server.

use anyhow::Context;
use axum::Router;
use stacks_db::Database;
use stacks_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// A migrated database with every module registered and initialized.
pub struct Application {
    pub db: Database,
    pub registry: ModuleRegistry,
}

impl Application {
    /// Register modules against `db`, apply migrations and initialize.
    pub async fn assemble(db: Database, settings: &Settings) -> anyhow::Result<Self> {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &db);

        registry.migrate(&db).await?;

        let ctx = InitCtx {
            settings,
            db: &db,
        };
        registry.init_all(&ctx).await?;

        Ok(Self { db, registry })
    }

    pub fn router(&self, settings: &Settings) -> Router {
        stacks_http::build_router(&self.registry, settings)
    }
}

async fn connect(settings: &Settings) -> anyhow::Result<Database> {
    Database::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database.url))
}

/// Run the service until a shutdown signal arrives.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let db = connect(settings).await?;
    let app = Application::assemble(db, settings).await?;

    let ctx = InitCtx {
        settings,
        db: &app.db,
    };
    app.registry.start_all(&ctx).await?;

    let served = stacks_http::start_server(&app.registry, settings, stacks_http::shutdown_signal()).await;

    let stopped = app.registry.stop_all().await;
    app.db.close().await;

    served?;
    stopped?;
    tracing::info!("stacks shutdown complete");
    Ok(())
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let db = connect(settings).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);
    let applied = registry.migrate(&db).await;

    db.close().await;
    applied
}
