use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tracing::debug;

use crate::api::rest::handlers::{self, ResourcePath};
use crate::domain::service::Service;

/// `GET /<path>` and `GET /<path>/{id}` for every endpoint the service holds.
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let mut routes = Router::new();
    for endpoint in service.endpoints() {
        let path = endpoint.descriptor().path.as_str();
        let resource = ResourcePath(Arc::from(path));
        debug!(path, "registering collection routes");
        routes = routes
            .route(
                &format!("/{path}"),
                get(handlers::list_records).layer(Extension(resource.clone())),
            )
            .route(
                &format!("/{path}/{{id}}"),
                get(handlers::get_record).layer(Extension(resource)),
            );
    }
    Ok(router.merge(routes.layer(Extension(service))))
}
