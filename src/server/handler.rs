use log::{info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::auth::AuthSessionManager;
use crate::config::{SharedRuntimeConfig, StartupConfig};
use crate::protocol::responses::{self, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::session::{Session, SessionRegistry};

/// Handles one client connection using Tokio async runtime.
///
/// - Rejects the connection when `max_clients` are already connected.
/// - Owns the connection's `Session`; every command operates on it.
/// - Keeps the registry's session id in sync after logout.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    manager: Arc<AuthSessionManager>,
    session_registry: Arc<Mutex<SessionRegistry>>,
    startup: Arc<StartupConfig>,
    runtime: SharedRuntimeConfig,
) -> Result<(), io::Error> {
    let (read_half, mut write_half) = stream.into_split();
    let mut session = Session::new(runtime.read().await.session_max_age());

    let max_clients = runtime.read().await.max_clients;
    {
        let mut registry = session_registry.lock().await;
        if registry.len() >= max_clients {
            warn!("Rejecting {}: connection limit {} reached", client_addr, max_clients);
            write_half
                .write_all(
                    format_response(
                        responses::SERVICE_UNAVAILABLE,
                        "Too many connections. Try again later.",
                    )
                    .as_bytes(),
                )
                .await?;
            return Ok(());
        }

        registry.insert(client_addr, session.id());
        info!(
            "Client connected: {} ({}/{} clients)",
            client_addr,
            registry.len(),
            max_clients
        );
    }

    let result = serve(
        read_half,
        &mut write_half,
        client_addr,
        &manager,
        &mut session,
        &session_registry,
        &startup,
        &runtime,
    )
    .await;

    session_registry.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);
    result
}

#[allow(clippy::too_many_arguments)]
async fn serve(
    read_half: OwnedReadHalf,
    write_half: &mut OwnedWriteHalf,
    client_addr: SocketAddr,
    manager: &AuthSessionManager,
    session: &mut Session,
    session_registry: &Mutex<SessionRegistry>,
    startup: &StartupConfig,
    runtime: &SharedRuntimeConfig,
) -> Result<(), io::Error> {
    write_half
        .write_all(format_response(responses::READY, "Welcome to RAX auth server").as_bytes())
        .await?;
    write_half.flush().await?;

    let max_line = startup.max_command_length;
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        // Room for a CRLF terminator, so a line one byte over the limit is detectable
        let n = (&mut reader)
            .take(max_line as u64 + 2)
            .read_until(b'\n', &mut buf)
            .await?;

        if n == 0 {
            info!("Connection closed by client {}", client_addr);
            break;
        }

        let terminated = buf.last() == Some(&b'\n');
        if command_length(&buf) > max_line {
            if !terminated {
                discard_line(&mut reader).await?;
            }
            warn!("Rejected command from {}: exceeded {} bytes", client_addr, max_line);
            write_half
                .write_all(format_response(responses::UNKNOWN_COMMAND, "Command too long").as_bytes())
                .await?;
            continue;
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            write_half
                .write_all(
                    format_response(responses::SYNTAX_ERROR, "Syntax error in parameters")
                        .as_bytes(),
                )
                .await?;
            continue;
        };

        let command = parse_command(line);
        info!("Received from {}: {:?}", client_addr, &command);

        session.set_max_age(runtime.read().await.session_max_age());
        let session_id = session.id();

        let result = handle_command(manager, session, command).await;

        if session.id() != session_id {
            session_registry
                .lock()
                .await
                .update(&client_addr, session.id());
        }

        if let Some(msg) = &result.message {
            write_half.write_all(msg.as_bytes()).await?;
        }

        match result.status {
            CommandStatus::CloseConnection => {
                info!("Client {} requested to quit", client_addr);
                break;
            }
            CommandStatus::Failure(reason) => {
                info!("Command from {} failed: {}", client_addr, reason);
            }
            CommandStatus::Success => {}
        }
    }

    Ok(())
}

/// Length of a raw line without its `\n` or `\r\n` terminator.
fn command_length(line: &[u8]) -> usize {
    match line {
        [rest @ .., b'\r', b'\n'] | [rest @ .., b'\n'] => rest.len(),
        _ => line.len(),
    }
}

/// Skips the remainder of an oversized line without buffering it.
async fn discard_line(reader: &mut BufReader<OwnedReadHalf>) -> Result<(), io::Error> {
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}
