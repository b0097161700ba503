use async_trait::async_trait;

use crate::contract::error::CatalogError;
use crate::contract::model::{Record, ResourceKind};

/// Public API of the catalog module for in-process consumers.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Query a collection with a raw query string (`limit=5&sort=name`).
    async fn list(&self, kind: ResourceKind, query: &str) -> Result<Vec<Record>, CatalogError>;

    /// Fetch one record by identifier.
    async fn get(
        &self,
        kind: ResourceKind,
        id: &str,
        query: &str,
    ) -> Result<Record, CatalogError>;
}
