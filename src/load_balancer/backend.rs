//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server by its validated base URL
//! - Own the forwarding handle used for every request to that server

use std::fmt;
use url::Url;

use crate::error::ProxyError;
use crate::http::forward::Forward;

/// Parse and validate a backend base URL.
///
/// Only plain `http` is accepted since the proxy does not speak TLS
/// upstream. The host is mandatory; the port is optional.
pub fn parse_address(address: &str) -> Result<Url, ProxyError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ProxyError::invalid_address(address, "address is empty"));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ProxyError::invalid_address(address, e.to_string()))?;

    if url.scheme() != "http" {
        return Err(ProxyError::invalid_address(
            address,
            format!("unsupported scheme {:?}, expected \"http\"", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ProxyError::invalid_address(address, "missing host"));
    }

    Ok(url)
}

/// A single backend server.
pub struct Backend {
    address: Url,
    forwarder: Box<dyn Forward>,
}

impl Backend {
    /// Create a backend from an already validated address.
    pub fn new(address: Url, forwarder: Box<dyn Forward>) -> Self {
        Self { address, forwarder }
    }

    /// The backend's base URL.
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// The forwarding handle owned by this backend.
    pub fn forwarder(&self) -> &dyn Forward {
        self.forwarder.as_ref()
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("address", &self.address.as_str())
            .field("forwarder", &self.forwarder)
            .finish()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Url always renders the root path as a trailing slash.
        f.write_str(self.address.as_str().trim_end_matches('/'))
    }
}
