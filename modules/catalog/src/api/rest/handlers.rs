use std::sync::Arc;

use api_ingress::AppError;
use axum::{
    extract::{Path, RawQuery},
    response::Json,
    Extension,
};
use tracing::debug;

use crate::api::rest::error::map_domain_error;
use crate::contract::model::Record;
use crate::domain::service::Service;

/// Which collection a route serves; attached per route.
#[derive(Debug, Clone)]
pub struct ResourcePath(pub Arc<str>);

/// `GET /<resource>?<query>`
pub async fn list_records(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ResourcePath(resource)): Extension<ResourcePath>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Record>>, AppError> {
    let query = query.unwrap_or_default();
    debug!(%resource, %query, "listing records");
    svc.list(&resource, &query)
        .await
        .map(Json)
        .map_err(map_domain_error)
}

/// `GET /<resource>/{id}?<query>`
pub async fn get_record(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ResourcePath(resource)): Extension<ResourcePath>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Record>, AppError> {
    let query = query.unwrap_or_default();
    debug!(%resource, %id, "getting record");
    svc.get(&resource, &id, &query)
        .await
        .map(Json)
        .map_err(map_domain_error)
}
