//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: configured address
//!     → backend.rs (parse & validate, attach forwarder)
//!     → registry.rs (append in order)
//!
//! Per request:
//!     → registry.rs (backend at cursor, cursor advances)
//!     → dispatcher forwards outside the registry lock
//! ```
//!
//! # Design Decisions
//! - Strict round-robin; no weights, no health filtering
//! - One mutex guards both the list and the cursor
//! - The registry is an owned instance, never global state

pub mod backend;
pub mod registry;

pub use backend::Backend;
pub use registry::Registry;
