//! RAX Auth Server - Entry Point
//!
//! Registers credentials, verifies logins and tracks per-connection
//! authentication state over a line-based control protocol.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use rax_auth_server::auth::PasswordHasher;
use rax_auth_server::error::ServerError;
use rax_auth_server::{
    AuthSessionManager, CredentialStore, MemoryCredentialStore, Server, ServerConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching auth server...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;

    let hasher = PasswordHasher::build(config.startup.hash_params()).await?;
    let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
    let manager = Arc::new(AuthSessionManager::new(
        store,
        hasher,
        config.startup.input_limits(),
    ));

    let server = Server::bind(config, manager).await?;

    tokio::select! {
        _ = server.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
