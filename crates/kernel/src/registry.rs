use anyhow::Context;
use std::sync::Arc;

use adoptme_db::Database;

use crate::module::{InitCtx, Module};

/// Core module initialization order
const CORE_MODULE_ORDER: &[&str] = &[
    "users",     // Owners must exist before anything references them
    "pets",      // Pets are adopted by users
    "adoptions", // Links users and pets
];

#[derive(Debug, Clone, Copy)]
enum Tier {
    Core,
    Custom,
}

impl Tier {
    fn label(self) -> &'static str {
        match self {
            Tier::Core => "core",
            Tier::Custom => "custom",
        }
    }
}

/// Module registry for managing module lifecycle with core/custom separation
pub struct ModuleRegistry {
    core_modules: Vec<Arc<dyn Module>>,
    custom_modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            core_modules: Vec::new(),
            custom_modules: Vec::new(),
        }
    }

    /// Register a core module with the registry
    pub fn register_core(&mut self, module: Arc<dyn Module>) {
        self.core_modules.push(module);
    }

    /// Register a custom module with the registry
    pub fn register_custom(&mut self, module: Arc<dyn Module>) {
        self.custom_modules.push(module);
    }

    /// Get all registered modules (core in lifecycle order, then custom)
    pub fn modules(&self) -> Vec<&Arc<dyn Module>> {
        let mut all_modules = self.ordered_core_modules();
        all_modules.extend(self.custom_modules.iter());
        all_modules
    }

    /// Get a module by name (searches both core and custom modules)
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.core_modules
            .iter()
            .find(|module| module.name() == name)
            .or_else(|| {
                self.custom_modules
                    .iter()
                    .find(|module| module.name() == name)
            })
    }

    /// Get the number of core modules
    pub fn core_module_count(&self) -> usize {
        self.core_modules.len()
    }

    /// Get the number of custom modules
    pub fn custom_module_count(&self) -> usize {
        self.custom_modules.len()
    }

    /// Core modules named in `CORE_MODULE_ORDER` first, then any others in
    /// registration order
    fn ordered_core_modules(&self) -> Vec<&Arc<dyn Module>> {
        let mut ordered: Vec<&Arc<dyn Module>> = CORE_MODULE_ORDER
            .iter()
            .filter_map(|&name| self.core_modules.iter().find(|m| m.name() == name))
            .collect();

        ordered.extend(
            self.core_modules
                .iter()
                .filter(|m| !CORE_MODULE_ORDER.contains(&m.name())),
        );
        ordered
    }

    /// Collect the collections declared by all modules, sorted and deduplicated
    pub fn collect_collections(&self) -> Vec<&'static str> {
        let mut collections: Vec<&'static str> = self
            .core_modules
            .iter()
            .chain(self.custom_modules.iter())
            .flat_map(|module| module.collections())
            .collect();

        collections.sort_unstable();
        collections.dedup();
        collections
    }

    /// Declare every module's collections in the database
    pub async fn prepare_collections(&self, db: &Database) {
        let collections = self.collect_collections();
        tracing::info!("preparing collections: {:?}", collections);

        for collection in collections {
            db.ensure_collection(collection).await;
        }
    }

    fn tier(&self, tier: Tier) -> Vec<&Arc<dyn Module>> {
        match tier {
            Tier::Core => self.ordered_core_modules(),
            Tier::Custom => self.custom_modules.iter().collect(),
        }
    }

    /// Initialize core modules in lifecycle order, then custom modules
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for tier in [Tier::Core, Tier::Custom] {
            for module in self.tier(tier) {
                tracing::info!(module = module.name(), tier = tier.label(), "initializing module");
                module.init(ctx).await.with_context(|| {
                    format!("failed to initialize {} module '{}'", tier.label(), module.name())
                })?;
            }
        }
        Ok(())
    }

    /// Start background work, same order as `init_all`
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for tier in [Tier::Core, Tier::Custom] {
            for module in self.tier(tier) {
                tracing::debug!(module = module.name(), tier = tier.label(), "starting module");
                module.start(ctx).await.with_context(|| {
                    format!("failed to start {} module '{}'", tier.label(), module.name())
                })?;
            }
        }
        Ok(())
    }

    /// Stop custom modules, then core modules, each in reverse order.
    /// Every module is asked to stop even when an earlier one fails; the
    /// first failure is returned.
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        let mut first_failure = None;

        for tier in [Tier::Custom, Tier::Core] {
            for module in self.tier(tier).into_iter().rev() {
                tracing::info!(module = module.name(), tier = tier.label(), "stopping module");
                if let Err(err) = module.stop().await {
                    tracing::error!(module = module.name(), error = %err, "module failed to stop");
                    if first_failure.is_none() {
                        first_failure = Some(err.context(format!(
                            "failed to stop {} module '{}'",
                            tier.label(),
                            module.name()
                        )));
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
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
        collections: Vec<&'static str>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl TestModule {
        fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                collections: vec![name],
                log: Arc::clone(log),
            })
        }

        fn record(&self, event: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", event, self.name));
        }
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn collections(&self) -> Vec<&'static str> {
            self.collections.clone()
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("init");
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.record("stop");
            Ok(())
        }
    }

    struct FailingModule;

    #[async_trait::async_trait]
    impl Module for FailingModule {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }

        async fn stop(&self) -> anyhow::Result<()> {
            anyhow::bail!("stuck")
        }
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert!(registry.modules().is_empty());
        assert!(registry.collect_collections().is_empty());
    }

    #[test]
    fn core_modules_follow_lifecycle_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_core(TestModule::new("adoptions", &log));
        registry.register_custom(TestModule::new("mocks", &log));
        registry.register_core(TestModule::new("users", &log));
        registry.register_core(TestModule::new("pets", &log));

        let names: Vec<_> = registry.modules().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["users", "pets", "adoptions", "mocks"]);
        assert_eq!(registry.core_module_count(), 3);
        assert_eq!(registry.custom_module_count(), 1);
        assert!(registry.get_module("mocks").is_some());
        assert!(registry.get_module("reviews").is_none());
    }

    #[tokio::test]
    async fn collections_are_declared_in_the_database() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_core(TestModule::new("pets", &log));
        registry.register_core(TestModule::new("users", &log));
        registry.register_custom(TestModule::new("pets", &log));

        assert_eq!(registry.collect_collections(), vec!["pets", "users"]);

        let db = Database::in_memory();
        registry.prepare_collections(&db).await;
        assert_eq!(db.collection_names().await, vec!["pets", "users"]);
    }

    #[tokio::test]
    async fn test_module_lifecycle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        let settings = Settings::default();
        let db = Database::in_memory();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };

        registry.register_core(TestModule::new("pets", &log));
        registry.register_core(TestModule::new("users", &log));
        registry.register_custom(TestModule::new("mocks", &log));

        registry.init_all(&ctx).await.unwrap();
        registry.start_all(&ctx).await.unwrap();
        registry.stop_all().await.unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "init:users",
                "init:pets",
                "init:mocks",
                "stop:mocks",
                "stop:pets",
                "stop:users",
            ]
        );
    }

    #[tokio::test]
    async fn init_failures_name_the_module() {
        let mut registry = ModuleRegistry::new();
        let settings = Settings::default();
        let db = Database::in_memory();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        registry.register_custom(Arc::new(FailingModule));

        let err = registry.init_all(&ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to initialize custom module 'broken'"
        );
    }

    #[tokio::test]
    async fn stop_failures_do_not_skip_other_modules() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_core(TestModule::new("users", &log));
        registry.register_custom(Arc::new(FailingModule));

        let err = registry.stop_all().await.unwrap_err();
        assert_eq!(err.to_string(), "failed to stop custom module 'broken'");
        assert_eq!(log.lock().unwrap().clone(), vec!["stop:users"]);
    }
}
