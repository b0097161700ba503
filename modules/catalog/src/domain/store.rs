//! Load-once, read-many collection store.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::domain::collection::Collection;
use crate::domain::error::DomainError;
use crate::domain::ports::DataProvider;

type Slot = Arc<OnceCell<Arc<Collection>>>;

/// Each collection is loaded from the provider at most once; concurrent first
/// requests share that single load. A failed load leaves the slot empty so a
/// later request retries.
pub struct CollectionStore {
    provider: Arc<dyn DataProvider>,
    slots: DashMap<String, Slot>,
}

impl CollectionStore {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self {
            provider,
            slots: DashMap::new(),
        }
    }

    #[instrument(name = "catalog.store.get", skip(self))]
    pub async fn get(&self, name: &str) -> Result<Arc<Collection>, DomainError> {
        // Clone the slot out so no map guard is held across the await.
        let slot: Slot = self.slots.entry(name.to_string()).or_default().clone();
        let collection = slot
            .get_or_try_init(|| async {
                debug!("loading collection");
                let records = self.provider.load(name).await.map_err(|e| {
                    warn!(error = %e, "collection load failed");
                    DomainError::storage(name, format!("{e:#}"))
                })?;
                info!(records = records.len(), "collection loaded");
                Ok::<_, DomainError>(Arc::new(Collection::new(name, records)))
            })
            .await?;
        Ok(collection.clone())
    }

    /// Whether a collection is currently cached.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.initialized())
    }

    /// Drop the cached copy; the next `get` loads again.
    pub fn reload(&self, name: &str) {
        if self.slots.remove(name).is_some() {
            info!(collection = name, "collection evicted");
        }
    }

    pub fn reload_all(&self) {
        self.slots.clear();
    }
}
