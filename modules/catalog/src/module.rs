use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::CatalogConfig;
use crate::contract::client::CatalogApi;
use crate::domain::ports::DataProvider;
use crate::domain::resources;
use crate::domain::service::Service;
use crate::domain::store::CollectionStore;
use crate::gateways::local::CatalogLocalClient;
use crate::infra::storage::JsonFileProvider;

/// The catalog module: read-only item, block and crafting-recipe collections.
#[derive(Default)]
pub struct Catalog {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the JSON file provider from `cfg` and build every endpoint.
    pub async fn init(&self, cfg: &CatalogConfig) -> anyhow::Result<()> {
        info!("Initializing catalog module");
        debug!(data_dir = %cfg.data_dir.display(), preload = cfg.preload, "catalog config");
        let provider = JsonFileProvider::new(&cfg.data_dir);
        self.init_with_provider(Arc::new(provider), cfg.preload)
            .await
    }

    /// Build every endpoint over an arbitrary provider. A bad resource
    /// definition or, with `preload`, an unreadable collection fails here.
    pub async fn init_with_provider(
        &self,
        provider: Arc<dyn DataProvider>,
        preload: bool,
    ) -> anyhow::Result<()> {
        let store = Arc::new(CollectionStore::new(provider));
        let service = Service::new(resources::all()?, store)?;
        if preload {
            service.preload().await?;
        }
        self.service.store(Some(Arc::new(service)));
        info!("Catalog module initialized");
        Ok(())
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn CatalogApi>> {
        Ok(Arc::new(CatalogLocalClient::new(self.service()?)))
    }

    /// Drop every cached collection; the next request reloads from storage.
    pub fn reload(&self) -> anyhow::Result<()> {
        self.service()?.store().reload_all();
        info!("Catalog collections evicted");
        Ok(())
    }

    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering catalog REST routes");
        let router = routes::register_routes(router, self.service()?)?;
        info!("Catalog REST routes registered successfully");
        Ok(router)
    }
}
