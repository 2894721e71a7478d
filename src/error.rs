//! Error types for the remote exec gateway

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::ssh::sanitize::Rejection;

/// Main error type for the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Command name is not in the catalog
    #[error("Command '{0}' is not in the whitelist. Only approved commands can be executed.")]
    UnknownCommand(String),

    /// A template placeholder had no value
    #[error(
        "Missing required parameter '{name}' for command '{command}'. Expected parameters: {expected:?}"
    )]
    MissingParameter {
        name: String,
        command: String,
        expected: Vec<String>,
    },

    /// A parameter value was refused by the sanitizer
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: Rejection },

    /// Execute was called on a session that is not connected
    #[error("Not connected. Call connect() first.")]
    NotConnected,

    /// A batch session was torn down by an earlier command's failure
    #[error("Session closed by an earlier failure in this batch: {0}")]
    SessionClosed(String),

    /// Network or protocol failure on the SSH transport
    #[error("SSH error: {0}")]
    Transport(String),

    /// Authentication failed (password or key)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Command execution exceeded its deadline
    #[error("Command timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog entry is inconsistent
    #[error("Invalid catalog entry: {0}")]
    Catalog(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SSH key parsing error
    #[error("SSH key error: {0}")]
    SshKey(String),
}

/// Result type alias using GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Coarse classification of a failure, reported alongside command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownCommand,
    MissingParameter,
    InvalidParameter,
    NotConnected,
    Transport,
    Timeout,
    Config,
}

impl GatewayError {
    /// Create a transport error from a string
    pub fn transport(msg: impl Into<String>) -> Self {
        GatewayError::Transport(msg.into())
    }

    /// Create an authentication error from a string
    pub fn auth(msg: impl Into<String>) -> Self {
        GatewayError::Authentication(msg.into())
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        GatewayError::Config(msg.into())
    }

    /// Create a catalog error from a string
    pub fn catalog(msg: impl Into<String>) -> Self {
        GatewayError::Catalog(msg.into())
    }

    /// The kind this error is reported as
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            GatewayError::MissingParameter { .. } => ErrorKind::MissingParameter,
            GatewayError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            GatewayError::NotConnected | GatewayError::SessionClosed(_) => {
                ErrorKind::NotConnected
            }
            GatewayError::Transport(_) | GatewayError::Authentication(_) => ErrorKind::Transport,
            GatewayError::Timeout(_) => ErrorKind::Timeout,
            GatewayError::Config(_)
            | GatewayError::Catalog(_)
            | GatewayError::Io(_)
            | GatewayError::SshKey(_) => ErrorKind::Config,
        }
    }
}
