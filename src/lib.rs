pub mod auth;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;

pub use crate::auth::{AuthSession, AuthSessionManager, CredentialStore, MemoryCredentialStore};
pub use crate::config::ServerConfig;
pub use crate::server::Server;
