use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::CatalogApi,
    error::CatalogError,
    model::{Record, ResourceKind},
};
use crate::domain::service::Service;

/// Local implementation of the CatalogApi trait that delegates to the domain service
pub struct CatalogLocalClient {
    service: Arc<Service>,
}

impl CatalogLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CatalogApi for CatalogLocalClient {
    async fn list(&self, kind: ResourceKind, query: &str) -> Result<Vec<Record>, CatalogError> {
        self.service
            .list(kind.path(), query)
            .await
            .map_err(CatalogError::from)
    }

    async fn get(
        &self,
        kind: ResourceKind,
        id: &str,
        query: &str,
    ) -> Result<Record, CatalogError> {
        self.service
            .get(kind.path(), id, query)
            .await
            .map_err(CatalogError::from)
    }
}
