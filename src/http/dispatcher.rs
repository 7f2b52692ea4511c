//! Request dispatch.
//!
//! # Responsibilities
//! - Ask the registry for the next backend
//! - Delegate to that backend's forwarder, bounded by the request timeout
//!   from dispatch until the last body chunk is relayed
//! - Convert every failure into an HTTP response
//!
//! # Design Decisions
//! - Stateless between requests; each request is independent
//! - No retry against another backend; the cursor is never rolled back
//! - Client disconnect drops this future and with it the upstream call

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::{stream, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{ForwardError, ProxyError};
use crate::load_balancer::{Backend, Registry};
use crate::observability::metrics;

/// Entry point for proxied traffic.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    request_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, request_timeout: Duration) -> Self {
        Self {
            registry,
            request_timeout,
        }
    }

    /// Route one request to the next backend and relay the outcome.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let Some(backend) = self.registry.next_backend() else {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No backend available");
            metrics::record_request(method.as_str(), 503, metrics::NO_BACKEND, start);
            return ProxyError::NoBackendAvailable.into_response();
        };
        let backend_label = backend.to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            backend = %backend_label,
            "Forwarding request"
        );

        match self.forward(&backend, request).await {
            Ok(response) => {
                metrics::record_request(
                    method.as_str(),
                    response.status().as_u16(),
                    &backend_label,
                    start,
                );
                response
            }
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    backend = %backend_label,
                    error = %err,
                    "Upstream request failed"
                );
                metrics::record_request(
                    method.as_str(),
                    err.status_code().as_u16(),
                    &backend_label,
                    start,
                );
                err.into_response()
            }
        }
    }

    async fn forward(
        &self,
        backend: &Backend,
        request: Request<Body>,
    ) -> Result<Response, ProxyError> {
        let deadline = tokio::time::Instant::now() + self.request_timeout;
        let upstream = backend.forwarder().forward(request);
        match tokio::time::timeout_at(deadline, upstream).await {
            Ok(result) => {
                let (parts, body) = result?.into_parts();
                let body = with_deadline(body, deadline, self.request_timeout);
                Ok(Response::from_parts(parts, body))
            }
            Err(_) => Err(ForwardError::Timeout(self.request_timeout).into()),
        }
    }
}

/// Relay `body` until `deadline`, then fail the stream with a timeout.
///
/// Headers are already on their way to the client at this point, so the
/// only way to report the expiry is to abort the body.
fn with_deadline(body: Body, deadline: tokio::time::Instant, timeout: Duration) -> Body {
    let chunks = body.into_data_stream();
    Body::from_stream(stream::unfold(Some(chunks), move |state| async move {
        let mut chunks = state?;
        match tokio::time::timeout_at(deadline, chunks.next()).await {
            Ok(Some(chunk)) => Some((chunk, Some(chunks))),
            Ok(None) => None,
            Err(_) => {
                tracing::warn!(timeout = ?timeout, "Upstream body exceeded request timeout");
                Some((Err(axum::Error::new(ForwardError::Timeout(timeout))), None))
            }
        }
    }))
}

/// Axum handler for every method and path.
pub async fn proxy_handler(
    State(dispatcher): State<Dispatcher>,
    request: Request<Body>,
) -> Response {
    dispatcher.handle(request).await
}
