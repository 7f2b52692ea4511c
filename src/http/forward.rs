//! Forwarding adapter.
//!
//! # Responsibilities
//! - Define the `Forward` capability owned by each backend
//! - Rewrite an inbound request onto the backend's base URL
//! - Relay the backend response back as a stream
//!
//! # Design Decisions
//! - One shared hyper client; each `HttpForwarder` holds a cheap clone
//! - No per-request state inside a forwarder, so it is safe to share
//! - Dropping the returned future aborts the upstream call

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{uri::PathAndQuery, Request, Response, Uri, Version},
};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::error::Error as StdError;
use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::TimeoutConfig;
use crate::error::ForwardError;
use crate::http::headers;

/// HTTP client shared by all forwarders.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the upstream client with the configured connect timeout.
pub fn build_client(timeouts: &TimeoutConfig) -> UpstreamClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(timeouts.connect()));
    Client::builder(TokioExecutor::new()).build(connector)
}

/// Relays a request to one fixed target and returns its response.
pub trait Forward: Send + Sync + fmt::Debug {
    fn forward(
        &self,
        request: Request<Body>,
    ) -> BoxFuture<'static, Result<Response<Body>, ForwardError>>;
}

/// Single-host reverse proxy over the shared hyper client.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    target: Url,
    client: UpstreamClient,
}

impl HttpForwarder {
    pub fn new(target: Url, client: UpstreamClient) -> Self {
        Self { target, client }
    }

    fn prepare(&self, request: Request<Body>) -> Result<Request<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = rewrite_uri(&self.target, &parts.uri)?;
        parts.version = Version::HTTP_11;

        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        headers::prepare_upstream(&mut parts.headers, client_ip);

        Ok(Request::from_parts(parts, body))
    }
}

impl Forward for HttpForwarder {
    fn forward(
        &self,
        request: Request<Body>,
    ) -> BoxFuture<'static, Result<Response<Body>, ForwardError>> {
        let prepared = self.prepare(request);
        let client = self.client.clone();

        Box::pin(async move {
            let request = prepared?;
            let response: Response<Incoming> = client
                .request(request)
                .await
                .map_err(|e| ForwardError::Transport(error_chain(&e)))?;

            let (mut parts, body) = response.into_parts();
            headers::strip_hop_by_hop(&mut parts.headers);
            Ok(Response::from_parts(parts, Body::new(body)))
        })
    }
}

/// Point `uri` at `target`, joining paths and queries.
pub fn rewrite_uri(target: &Url, uri: &Uri) -> Result<Uri, ForwardError> {
    let host = target
        .host_str()
        .ok_or_else(|| ForwardError::Request(format!("target {target} has no host")))?;
    let authority = match target.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let path = join_paths(target.path(), uri.path());
    let query = match (
        target.query().filter(|q| !q.is_empty()),
        uri.query().filter(|q| !q.is_empty()),
    ) {
        (Some(base), Some(extra)) => Some(format!("{base}&{extra}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    };
    let path_and_query = match query {
        Some(q) => format!("{path}?{q}"),
        None => path,
    };

    Uri::builder()
        .scheme(target.scheme())
        .authority(authority.as_str())
        .path_and_query(
            PathAndQuery::try_from(path_and_query.as_str())
                .map_err(|e| ForwardError::Request(e.to_string()))?,
        )
        .build()
        .map_err(|e| ForwardError::Request(e.to_string()))
}

/// Join two path segments with exactly one slash between them.
fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
