//! HTTP host: owns the axum router, the cross-cutting layers and the listener.
//! Modules contribute routes through [`ApiIngress::register`].

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::{http::StatusCode, middleware::from_fn, response::Response, routing::get, Router};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod error;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;
pub use error::{AppError, INTERNAL_ERROR_MESSAGE};
pub use web::ROOT_MESSAGE;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8087";

pub struct ApiIngress {
    // Lock-free config using arc-swap for read-mostly access
    config: ArcSwap<ApiIngressConfig>,
    // Routes contributed by modules, merged under the layers at build time
    routes: Mutex<Router>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            routes: Mutex::new(Router::new()),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn set_config(&self, config: ApiIngressConfig) {
        self.config.store(Arc::new(config));
    }

    /// Hand the route table to a module. On error the table is left as it was.
    pub fn register<F>(&self, register: F) -> Result<()>
    where
        F: FnOnce(Router) -> Result<Router>,
    {
        let mut routes = self.routes.lock();
        let next = register(routes.clone())?;
        *routes = next;
        Ok(())
    }

    /// Build the HTTP router from registered routes.
    ///
    /// Layers, outermost first: set request id -> propagate request id ->
    /// trace -> request id to extensions -> catch panic -> timeout -> CORS.
    pub fn build_router(&self) -> Router {
        let cfg = self.config();
        tracing::debug!(?cfg, "building router");

        let mut router = Router::new()
            .route("/", get(web::root))
            .route("/health", get(web::health_check))
            .merge(self.routes.lock().clone());

        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        // Zero disables the timeout.
        if cfg.timeout_sec > 0 {
            router = router.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(cfg.timeout_sec),
            ));
        }

        let x_request_id = request_id::header();
        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    request_id::MakeReqId,
                ))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(request_id::create_trace_layer())
                .layer(from_fn(request_id::push_req_id_to_extensions))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
    }

    /// Bind the configured address (or [`DEFAULT_BIND_ADDR`]).
    pub async fn bind(&self) -> Result<TcpListener> {
        let cfg = self.config();
        let raw = cfg.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let addr: SocketAddr = raw
            .parse()
            .with_context(|| format!("Invalid bind address '{raw}'"))?;
        TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))
    }

    /// Serve until `cancel` fires, then drain in-flight requests.
    pub async fn serve(&self, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        let router = self.build_router();
        let addr = listener.local_addr()?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");
    error::text_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}
