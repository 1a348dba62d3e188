//! Module `commands`
//!
//! Defines the control commands, their parsing, and the result structures
//! returned by command handlers.

use secrecy::SecretString;

/// Represents a command parsed from one line of client input.
///
/// Passwords are held as `SecretString` so logging a command never prints them.
#[derive(Debug)]
pub enum Command {
    REGISTER(String, SecretString), // Identifier, password
    LOGIN(String, SecretString),    // Identifier, password
    LOGOUT,
    STATUS, // Query current authentication state
    QUIT,
    MALFORMED(String), // Known verb with missing arguments
    UNKNOWN,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses a raw line received from a client into the `Command` enum.
///
/// For REGISTER and LOGIN the password is everything after the first
/// whitespace following the identifier, so it may contain spaces.
pub fn parse_command(raw: &str) -> Command {
    let line = raw.trim_end_matches(['\r', '\n']).trim_start();
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim_start()),
        None => (line, ""),
    };
    let cmd = cmd.to_ascii_uppercase();

    match cmd.as_str() {
        "REGISTER" => match split_credentials(arg) {
            Some((id, pw)) => Command::REGISTER(id, pw),
            None => Command::MALFORMED(cmd),
        },
        "LOGIN" => match split_credentials(arg) {
            Some((id, pw)) => Command::LOGIN(id, pw),
            None => Command::MALFORMED(cmd),
        },
        "LOGOUT" => Command::LOGOUT,
        "STATUS" => Command::STATUS,
        "QUIT" | "Q" => Command::QUIT,
        _ => Command::UNKNOWN,
    }
}

fn split_credentials(arg: &str) -> Option<(String, SecretString)> {
    let (identifier, password) = arg.split_once(char::is_whitespace)?;
    if identifier.is_empty() || password.is_empty() {
        return None;
    }
    Some((
        identifier.to_string(),
        SecretString::from(password.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_basic_commands() {
        assert!(matches!(parse_command("LOGOUT\r\n"), Command::LOGOUT));
        assert!(matches!(parse_command("status"), Command::STATUS));
        assert!(matches!(parse_command("QUIT"), Command::QUIT));
        assert!(matches!(parse_command("q"), Command::QUIT));
        assert!(matches!(parse_command("BADCMD"), Command::UNKNOWN));
        assert!(matches!(parse_command(""), Command::UNKNOWN));
    }

    #[test]
    fn test_parse_register() {
        match parse_command("REGISTER alice@example.com Secr3t!\r\n") {
            Command::REGISTER(id, pw) => {
                assert_eq!(id, "alice@example.com");
                assert_eq!(pw.expose_secret(), "Secr3t!");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_login_password_with_spaces() {
        match parse_command("login bob correct horse battery ") {
            Command::LOGIN(id, pw) => {
                assert_eq!(id, "bob");
                assert_eq!(pw.expose_secret(), "correct horse battery ");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_arguments() {
        assert!(matches!(parse_command("LOGIN"), Command::MALFORMED(ref v) if v == "LOGIN"));
        assert!(matches!(parse_command("LOGIN bob"), Command::MALFORMED(_)));
        assert!(matches!(parse_command("REGISTER bob "), Command::MALFORMED(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let command = parse_command("LOGIN bob hunter2");
        assert!(!format!("{command:?}").contains("hunter2"));
    }
}
