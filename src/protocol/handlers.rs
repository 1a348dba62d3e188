//! Command handlers for the RAX auth server.
//!
//! Each handler calls one auth manager operation with the connection's own
//! session and turns the outcome into a reply line.

use log::info;
use secrecy::SecretString;

use crate::auth::AuthSessionManager;
use crate::error::AuthError;
use crate::error::handlers::error_to_reply_code;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::session::Session;

/// Dispatches a parsed command to its handler.
///
/// # Arguments
///
/// * `manager` - Shared auth manager.
/// * `session` - The calling connection's session.
/// * `command` - Parsed command, consumed so passwords are dropped after use.
pub async fn handle_command(
    manager: &AuthSessionManager,
    session: &mut Session,
    command: Command,
) -> CommandResult {
    match command {
        Command::REGISTER(identifier, password) => {
            handle_cmd_register(manager, &identifier, password).await
        }
        Command::LOGIN(identifier, password) => {
            handle_cmd_login(manager, session, &identifier, password).await
        }
        Command::LOGOUT => handle_cmd_logout(manager, session),
        Command::STATUS => handle_cmd_status(manager, session),
        Command::QUIT => handle_cmd_quit(manager, session),
        Command::MALFORMED(verb) => handle_cmd_malformed(&verb),
        Command::UNKNOWN => handle_cmd_unknown(),
    }
}

/// Handles REGISTER. Registration never logs the session in.
async fn handle_cmd_register(
    manager: &AuthSessionManager,
    identifier: &str,
    password: SecretString,
) -> CommandResult {
    match manager.register(identifier, password).await {
        Ok(_) => success(responses::REGISTERED, "Registration successful"),
        Err(e) => failure(&e),
    }
}

/// Handles LOGIN: marks the session authenticated on success.
async fn handle_cmd_login(
    manager: &AuthSessionManager,
    session: &mut Session,
    identifier: &str,
    password: SecretString,
) -> CommandResult {
    match manager.authenticate(identifier, password, session).await {
        Ok(_) => success(responses::LOGIN_SUCCESS, "Login successful"),
        Err(e) => failure(&e),
    }
}

/// Handles LOGOUT. Succeeds whether or not the session was authenticated.
fn handle_cmd_logout(manager: &AuthSessionManager, session: &mut Session) -> CommandResult {
    manager.end_session(session);
    success(responses::GOODBYE, "Logout successful")
}

/// Handles STATUS: reports the authentication flag as `true`/`false`.
fn handle_cmd_status(manager: &AuthSessionManager, session: &Session) -> CommandResult {
    let authenticated = manager.is_authenticated(Some(session));
    success(responses::STATUS, &authenticated.to_string())
}

/// Handles QUIT: ends the session and signals connection close.
fn handle_cmd_quit(manager: &AuthSessionManager, session: &mut Session) -> CommandResult {
    manager.end_session(session);
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::GOODBYE, "Goodbye")),
    }
}

fn handle_cmd_malformed(verb: &str) -> CommandResult {
    info!("Rejected {} with missing arguments", verb);
    CommandResult {
        status: CommandStatus::Failure(format!("{} requires an identifier and a password", verb)),
        message: Some(format_response(
            responses::SYNTAX_ERROR,
            "Syntax error in parameters",
        )),
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Unknown command".into()),
        message: Some(format_response(responses::UNKNOWN_COMMAND, "Unknown command")),
    }
}

fn success(code: u16, message: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(code, message)),
    }
}

fn failure(err: &AuthError) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(err.to_string()),
        message: Some(format_response(error_to_reply_code(err), &err.to_string())),
    }
}
