//! Error taxonomy for the proxy.
//!
//! Configuration-time errors abort startup. Per-request errors are turned
//! into HTTP responses here and never escape the handler.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure while relaying a request to a backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Backend unreachable, connection reset, or malformed upstream response.
    #[error("upstream transport error: {0}")]
    Transport(String),
    /// The upstream did not answer within the request timeout.
    #[error("upstream timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// The inbound request could not be rewritten for the backend.
    #[error("failed to build upstream request: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid backend address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("No backend available")]
    NoBackendAvailable,

    #[error(transparent)]
    Forwarding(#[from] ForwardError),
}

impl ProxyError {
    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        ProxyError::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Status code surfaced to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidAddress { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::NoBackendAvailable => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Forwarding(ForwardError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Forwarding(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match &self {
            ProxyError::NoBackendAvailable => "No backend available",
            ProxyError::Forwarding(ForwardError::Timeout(_)) => "Upstream request timed out",
            ProxyError::Forwarding(_) => "Upstream request failed",
            ProxyError::InvalidAddress { .. } => "Invalid backend configuration",
        };
        (self.status_code(), Body::from(body)).into_response()
    }
}
