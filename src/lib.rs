//! Round-robin load-balancing reverse proxy.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::ProxyConfig;
pub use error::{ForwardError, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::Registry;
