//! Protocol reply handling
//!
//! Defines reply codes and formatting.

/// Reply codes
pub const REGISTERED: u16 = 200;
pub const STATUS: u16 = 211;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const LOGIN_SUCCESS: u16 = 230;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const INTERNAL_ERROR: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const AUTH_FAILED: u16 = 530;
pub const ALREADY_REGISTERED: u16 = 550;

/// Format a reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
