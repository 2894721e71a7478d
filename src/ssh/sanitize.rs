//! Parameter sanitization
//!
//! Every value substituted into a command template passes through
//! [`sanitize_parameter`] first. The check is a pure filter: accepted values
//! are returned unchanged, nothing is escaped.
//!
//! Two stages run on every value:
//! 1. A denylist of shell metacharacters, reported precisely.
//! 2. An allow-list, `[a-zA-Z0-9._/-]+`, that closes whatever the denylist missed.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings that are rejected outright, in the order they are checked
pub const DISALLOWED_PATTERNS: &[&str] = &[
    ";", "&&", "||", "|", "`", "$(", "\n", "\r", ">", "<", "\\",
];

static SAFE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._/-]+$").expect("static pattern is valid"));

/// Why a parameter value was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The value contains one of [`DISALLOWED_PATTERNS`]
    DisallowedPattern(&'static str),

    /// The value is empty or contains characters outside the allow-list
    InvalidCharacters(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DisallowedPattern(pattern) => write!(
                f,
                "contains disallowed characters: '{}'. For security, only alphanumeric \
                 characters, hyphens, underscores, dots, and forward slashes are allowed.",
                pattern.escape_debug()
            ),
            Rejection::InvalidCharacters(value) => write!(
                f,
                "'{}' contains invalid characters. Only alphanumeric characters, dots, \
                 hyphens, underscores, and forward slashes are allowed.",
                value.escape_debug()
            ),
        }
    }
}

/// Validate a parameter value before substitution
///
/// Returns the value unchanged on success. A denylist match is reported in
/// preference to the allow-list failure it would also cause.
///
/// # Examples
/// ```
/// use remote_exec_mcp::ssh::sanitize::{sanitize_parameter, Rejection};
///
/// assert_eq!(sanitize_parameter("/var/log").unwrap(), "/var/log");
/// assert_eq!(
///     sanitize_parameter("nginx; rm -rf /"),
///     Err(Rejection::DisallowedPattern(";"))
/// );
/// ```
pub fn sanitize_parameter(value: &str) -> Result<&str, Rejection> {
    if let Some(pattern) = DISALLOWED_PATTERNS.iter().find(|p| value.contains(**p)) {
        return Err(Rejection::DisallowedPattern(*pattern));
    }

    if !SAFE_VALUE.is_match(value) {
        return Err(Rejection::InvalidCharacters(value.to_string()));
    }

    Ok(value)
}
