//! Server core functionality
//!
//! This module contains the TCP accept loop and the per-connection handler
//! that feeds client commands to the auth manager.

pub mod core;
pub mod handler;

pub use core::Server;
