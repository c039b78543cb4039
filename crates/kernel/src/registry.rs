use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Module};
use stacks_db::{Database, Migration};

/// Module registry driving the lifecycle of every registered module
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module. Registration order is lifecycle order.
    pub fn register(&mut self, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), "module registered");
        self.modules.push(module);
    }

    /// Get all registered modules
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Initialize modules in registration order
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Start modules in registration order
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop modules in reverse registration order
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Collect all migrations from all modules
    pub fn collect_migrations(&self) -> Vec<(String, Migration)> {
        let mut migrations = Vec::new();

        for module in &self.modules {
            for migration in module.migrations() {
                migrations.push((module.name().to_string(), migration));
            }
        }

        // Sort by module name and migration ID for deterministic ordering
        migrations.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(b.1.id)));

        migrations
    }

    /// Apply every collected migration against `db`
    pub async fn migrate(&self, db: &Database) -> anyhow::Result<usize> {
        let migrations = self.collect_migrations();
        let applied = db
            .apply_migrations(&migrations)
            .await
            .context("failed to apply migrations")?;

        tracing::info!(
            applied,
            known = migrations.len(),
            "schema migrations complete"
        );
        Ok(applied)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::sync::Mutex;

    struct TestModule {
        name: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.journal.lock().unwrap().push(format!("init {}", self.name));
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.journal.lock().unwrap().push(format!("stop {}", self.name));
            Ok(())
        }

        fn migrations(&self) -> Vec<Migration> {
            vec![
                Migration {
                    id: "002_index",
                    up: "SELECT 1;",
                },
                Migration {
                    id: "001_init",
                    up: "SELECT 1;",
                },
            ]
        }
    }

    fn registry_with(names: &[&'static str]) -> (ModuleRegistry, Arc<Mutex<Vec<String>>>) {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        for &name in names {
            registry.register(Arc::new(TestModule {
                name,
                journal: journal.clone(),
            }));
        }
        (registry, journal)
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert!(registry.modules().is_empty());
        assert!(registry.collect_migrations().is_empty());
    }

    #[test]
    fn test_migration_collection_is_sorted() {
        let (registry, _) = registry_with(&["borrows", "authors"]);
        let order: Vec<(String, &str)> = registry
            .collect_migrations()
            .into_iter()
            .map(|(module, migration)| (module, migration.id))
            .collect();

        assert_eq!(
            order,
            vec![
                ("authors".to_string(), "001_init"),
                ("authors".to_string(), "002_index"),
                ("borrows".to_string(), "001_init"),
                ("borrows".to_string(), "002_index"),
            ]
        );
    }

    #[test]
    fn test_get_module_by_name() {
        let (registry, _) = registry_with(&["authors", "books"]);
        assert_eq!(registry.module_count(), 2);
        assert!(registry.get_module("books").is_some());
        assert!(registry.get_module("borrows").is_none());
    }

    #[tokio::test]
    async fn test_module_lifecycle() {
        let (registry, journal) = registry_with(&["authors", "books"]);
        let settings = Settings::default();
        let db = Database::connect_in_memory().await.unwrap();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };

        registry.init_all(&ctx).await.unwrap();
        registry.start_all(&ctx).await.unwrap();
        registry.stop_all().await.unwrap();

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["init authors", "init books", "stop books", "stop authors"]
        );
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let (registry, _) = registry_with(&["authors"]);
        let db = Database::connect_in_memory().await.unwrap();

        assert_eq!(registry.migrate(&db).await.unwrap(), 2);
        assert_eq!(registry.migrate(&db).await.unwrap(), 0);
    }
}
