//! Configuration validation.
//!
//! Serde handles the syntax; this module checks semantics. Every problem
//! found is reported, not only the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::load_balancer::backend::parse_address;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("backends[{index}]: {reason}")]
    Backend { index: usize, reason: String },

    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Check a parsed configuration before any subsystem is built from it.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, backend) in config.backends.iter().enumerate() {
        if let Err(e) = parse_address(&backend.address) {
            errors.push(ValidationError::Backend {
                index,
                reason: e.to_string(),
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
