//! Backend registry and round-robin selection.
//!
//! # Responsibilities
//! - Own the ordered backend list and the rotation cursor
//! - Validate and register backends
//! - Hand out the next backend in strict round-robin order
//!
//! Both the list and the cursor live behind a single mutex. Critical
//! sections are pure in-memory updates; the lock is never held while a
//! request is being forwarded.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::ProxyError;
use crate::http::forward::{Forward, HttpForwarder, UpstreamClient};
use crate::load_balancer::backend::{parse_address, Backend};
use crate::observability::metrics;

#[derive(Debug, Default)]
struct RegistryState {
    backends: Vec<Arc<Backend>>,
    /// Index of the next backend to hand out. In `[0, len)` when non-empty.
    cursor: usize,
}

/// Concurrency-safe round-robin backend registry.
#[derive(Debug)]
pub struct Registry {
    state: Mutex<RegistryState>,
    client: UpstreamClient,
}

impl Registry {
    /// Create an empty registry whose backends share `client` for forwarding.
    pub fn new(client: UpstreamClient) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            client,
        }
    }

    /// Validate `address` and register it with an HTTP forwarder.
    pub fn add_backend(&self, address: &str) -> Result<Arc<Backend>, ProxyError> {
        let url = parse_address(address)?;
        let forwarder = HttpForwarder::new(url.clone(), self.client.clone());
        Ok(self.insert(Backend::new(url, Box::new(forwarder))))
    }

    /// Validate `address` and register it with a caller-supplied forwarder.
    pub fn add_backend_with(
        &self,
        address: &str,
        forwarder: Box<dyn Forward>,
    ) -> Result<Arc<Backend>, ProxyError> {
        let url = parse_address(address)?;
        Ok(self.insert(Backend::new(url, forwarder)))
    }

    fn insert(&self, backend: Backend) -> Arc<Backend> {
        let backend = Arc::new(backend);
        let len = {
            let mut state = self.state.lock();
            state.backends.push(Arc::clone(&backend));
            // Set under the lock so the gauge always ends at the final length.
            metrics::record_backend_count(state.backends.len());
            state.backends.len()
        };
        tracing::debug!(backend = %backend, count = len, "Backend registered");
        backend
    }

    /// Return the backend at the cursor and advance the cursor by one.
    ///
    /// Returns `None` when no backend is registered.
    pub fn next_backend(&self) -> Option<Arc<Backend>> {
        let mut state = self.state.lock();
        let len = state.backends.len();
        if len == 0 {
            return None;
        }

        let backend = Arc::clone(&state.backends[state.cursor]);
        state.cursor = (state.cursor + 1) % len;
        Some(backend)
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.state.lock().backends.len()
    }

    /// Whether no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the registered addresses in rotation order.
    pub fn addresses(&self) -> Vec<String> {
        self.state
            .lock()
            .backends
            .iter()
            .map(|b| b.to_string())
            .collect()
    }
}
