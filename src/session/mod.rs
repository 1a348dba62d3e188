//! Session management
//!
//! Per-connection session state and the registry of live connections.

pub mod registry;
pub mod state;

pub use registry::SessionRegistry;
pub use state::Session;
