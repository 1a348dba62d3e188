use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::auth::AuthSessionManager;
use crate::config::{ServerConfig, SharedRuntimeConfig, StartupConfig};
use crate::error::ServerError;
use crate::server::handler::handle_client;
use crate::session::SessionRegistry;

pub struct Server {
    listener: TcpListener,
    manager: Arc<AuthSessionManager>,
    session_registry: Arc<Mutex<SessionRegistry>>,
    startup: Arc<StartupConfig>,
    runtime: SharedRuntimeConfig,
}

impl Server {
    /// Binds the control socket. The manager (and its credential store) is
    /// owned by the caller and shared with every connection.
    pub async fn bind(
        config: ServerConfig,
        manager: Arc<AuthSessionManager>,
    ) -> Result<Self, ServerError> {
        let (startup, runtime) = config.split();
        let socket = startup.control_socket();

        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            manager,
            session_registry: Arc::new(Mutex::new(SessionRegistry::new())),
            startup: Arc::new(startup),
            runtime,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    pub async fn run(&self) {
        info!(
            "Starting RAX auth server (max {} clients)",
            self.runtime.read().await.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let manager = Arc::clone(&self.manager);
                    let session_registry = Arc::clone(&self.session_registry);
                    let startup = Arc::clone(&self.startup);
                    let runtime = Arc::clone(&self.runtime);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_client(stream, addr, manager, session_registry, startup, runtime)
                                .await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
