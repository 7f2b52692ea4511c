//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router that sends every method and path to the dispatcher
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener until the shutdown future resolves

use axum::{routing::any, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::dispatcher::{proxy_handler, Dispatcher};
use crate::load_balancer::Registry;

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that dispatches across `registry`.
    pub fn new(config: ProxyConfig, registry: Arc<Registry>) -> Self {
        let dispatcher = Dispatcher::new(registry, config.timeouts.request());
        let router = Self::build_router(dispatcher);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(dispatcher: Dispatcher) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(dispatcher)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve connections on `listener` until `shutdown` resolves, then wait
    /// for in-flight requests to finish.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Load balancer started");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
