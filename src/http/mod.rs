//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → dispatcher.rs (pick next backend from the registry)
//!     → forward.rs (rewrite target, relay via hyper client)
//!     → headers.rs (hop-by-hop stripping, X-Forwarded-For)
//!     → Send backend response (or 502/503/504) to client
//! ```

pub mod dispatcher;
pub mod forward;
pub mod headers;
pub mod server;

pub use dispatcher::Dispatcher;
pub use forward::{build_client, Forward, HttpForwarder, UpstreamClient};
pub use server::HttpServer;
