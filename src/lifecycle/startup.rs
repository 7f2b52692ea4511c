//! Startup orchestration.
//!
//! # Responsibilities
//! - Populate the registry from the static backend list
//! - Fail fast on the first invalid address, before any listener opens

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::forward::build_client;
use crate::load_balancer::Registry;

/// Build a registry holding every configured backend, in configuration order.
pub fn build_registry(config: &ProxyConfig) -> Result<Registry, ProxyError> {
    let registry = Registry::new(build_client(&config.timeouts));

    for backend in &config.backends {
        registry.add_backend(&backend.address)?;
    }

    if registry.is_empty() {
        tracing::warn!("No backends configured; every request will receive 503");
    } else {
        tracing::info!(backends = ?registry.addresses(), "Backends registered");
    }

    Ok(registry)
}
