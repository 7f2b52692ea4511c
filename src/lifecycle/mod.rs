//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build registry → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registry, then listener
//! - Shutdown has a grace period: forced exit (non-zero) after the deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{drain, Shutdown, ShutdownError};
pub use signals::shutdown_signal;
pub use startup::build_registry;
