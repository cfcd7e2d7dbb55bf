//! Application assembly: document store, stores, module registry and HTTP server.

use std::future::Future;

use anyhow::Context;
use axum::Router;

use adoptme_db::{Database, Pet, Stores, User};
use adoptme_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{
    self,
    mocks::{
        models::{GenerateData, GeneratedData},
        service::MockService,
    },
};

pub struct App {
    settings: Settings,
    db: Database,
    stores: Stores,
    registry: ModuleRegistry,
}

impl App {
    /// Open the document store, register modules, declare their collections
    /// and initialize them.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::open(settings.database.snapshot_path.clone())
            .await
            .context("failed to open document store")?;
        let stores = Stores::document(&db);

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &stores, &settings);
        registry.prepare_collections(&db).await;

        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        registry.init_all(&ctx).await?;

        tracing::info!(
            core = registry.core_module_count(),
            custom = registry.custom_module_count(),
            persistent = db.snapshot_path().is_some(),
            "application bootstrapped"
        );

        Ok(Self {
            settings,
            db,
            stores,
            registry,
        })
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn router(&self) -> Router {
        adoptme_http::build_router(&self.registry, &self.settings)
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> anyhow::Result<()> {
        self.serve_until(adoptme_http::shutdown_signal()).await
    }

    /// Start modules, serve until `shutdown` resolves, then stop modules and
    /// flush the snapshot.
    pub async fn serve_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.db,
        };
        self.registry.start_all(&ctx).await?;

        let served = adoptme_http::start_server(&self.registry, &self.settings, shutdown).await;

        self.registry.stop_all().await?;
        self.db
            .flush()
            .await
            .context("failed to flush document store")?;

        served
    }

    /// Insert mock users and pets and persist them to the snapshot.
    pub async fn seed(&self, users: usize, pets: usize) -> anyhow::Result<GeneratedData<User, Pet>> {
        if self.db.snapshot_path().is_none() {
            anyhow::bail!("seeding requires database.snapshot_path to be configured");
        }

        let service = MockService::from_stores(&self.stores, self.settings.mocks.clone());
        let generated = service
            .generate(GenerateData {
                users: Some(users),
                pets: Some(pets),
            })
            .await
            .context("failed to generate mock data")?;

        self.db
            .flush()
            .await
            .context("failed to flush document store")?;
        Ok(generated)
    }
}
