//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → main builds the Registry and server from it
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; any error is fatal before listening
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError};
pub use schema::{
    BackendConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, ShutdownConfig,
    TimeoutConfig,
};
