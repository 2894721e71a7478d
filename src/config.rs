//! Configuration and CLI argument parsing
//!
//! Every flag can also come from the environment (or a `.env` file loaded
//! in `main`). The resolved [`SshConfig`] is built once at startup and
//! passed down explicitly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::error::{GatewayError, Result};
use crate::ssh::{AuthMethod, HostKeyPolicy, SshConfig};

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default command timeout in seconds
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Remote exec MCP server CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "remote-exec-mcp")]
#[command(version)]
#[command(about = "MCP server that runs whitelisted diagnostic commands on a remote host over SSH")]
pub struct Args {
    /// SSH host to connect to
    #[arg(long, env = "SSH_HOST", default_value = "")]
    pub host: String,

    /// SSH port
    #[arg(long, default_value = "22", env = "SSH_PORT")]
    pub port: u16,

    /// SSH username
    #[arg(long, env = "SSH_USER", default_value = "")]
    pub user: String,

    /// Path to SSH private key file
    #[arg(long, env = "SSH_KEY_PATH")]
    pub key: Option<PathBuf>,

    /// Passphrase for the private key
    #[arg(long, env = "SSH_KEY_PASSPHRASE", hide_env_values = true)]
    pub key_passphrase: Option<String>,

    /// SSH password (alternative to key)
    #[arg(long, env = "SSH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// known_hosts file used to verify the server's host key
    #[arg(long, env = "SSH_KNOWN_HOSTS")]
    pub known_hosts: Option<PathBuf>,

    /// Expected host key fingerprint, e.g. SHA256:abc...
    #[arg(long, env = "SSH_HOST_FINGERPRINT")]
    pub host_fingerprint: Option<String>,

    /// Connection timeout in seconds
    #[arg(long, default_value = "30", env = "SSH_CONNECT_TIMEOUT")]
    pub connect_timeout: u64,

    /// Default command timeout in seconds
    #[arg(long, default_value = "60", env = "SSH_COMMAND_TIMEOUT")]
    pub command_timeout: u64,

    /// Check configuration and connectivity, then exit
    #[arg(long, default_value = "false")]
    pub check: bool,
}

/// Parsed and validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SSH host
    pub host: String,

    /// SSH port
    pub port: u16,

    /// SSH username
    pub user: String,

    /// Path to SSH private key
    pub key: Option<PathBuf>,

    /// Passphrase for the key
    pub key_passphrase: Option<String>,

    /// SSH password
    pub password: Option<String>,

    /// Host key verification
    pub host_key: HostKeyPolicy,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Default command timeout
    pub command_timeout: Duration,
}

impl Config {
    /// Create Config from CLI Args
    pub fn from_args(args: Args) -> Result<Self> {
        validate_args(&args)?;

        let host_key = match (args.known_hosts, args.host_fingerprint) {
            (Some(path), _) => HostKeyPolicy::KnownHosts(path),
            (None, Some(fp)) => HostKeyPolicy::Fingerprint(fp.trim().to_string()),
            (None, None) => HostKeyPolicy::AcceptAny,
        };

        Ok(Config {
            host: args.host.trim().to_string(),
            port: args.port,
            user: args.user.trim().to_string(),
            key: args.key,
            key_passphrase: non_empty(args.key_passphrase),
            password: non_empty(args.password),
            host_key,
            connect_timeout: Duration::from_secs(args.connect_timeout),
            command_timeout: Duration::from_secs(args.command_timeout),
        })
    }

    /// `user@host:port`
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }

    /// Resolve into the transport configuration
    ///
    /// Reads and decodes the private key once; key authentication wins when
    /// both a key and a password are configured.
    pub async fn ssh_config(&self) -> Result<SshConfig> {
        let auth = match (&self.key, &self.password) {
            (Some(path), _) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(GatewayError::Io)?;
                let key = russh::keys::decode_secret_key(&content, self.key_passphrase.as_deref())
                    .map_err(|e| {
                        GatewayError::SshKey(format!(
                            "Failed to load private key {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                AuthMethod::Key(Arc::new(key))
            }
            (None, Some(password)) => AuthMethod::Password(password.clone()),
            (None, None) => {
                return Err(GatewayError::config(
                    "Must provide either --key or --password",
                ))
            }
        };

        Ok(SshConfig::new(&self.host, &self.user, auth)
            .with_port(self.port)
            .with_host_key(self.host_key.clone())
            .with_connect_timeout(self.connect_timeout)
            .with_command_timeout(self.command_timeout))
    }
}

/// Validate CLI arguments, collecting every problem
fn validate_args(args: &Args) -> Result<()> {
    let mut errors = Vec::new();

    if args.host.trim().is_empty() {
        errors.push("Missing required --host (SSH_HOST)".to_string());
    }

    if args.user.trim().is_empty() {
        errors.push("Missing required --user (SSH_USER)".to_string());
    }

    if args.key.is_none() && non_empty(args.password.clone()).is_none() {
        errors.push("Must provide either --key (SSH_KEY_PATH) or --password (SSH_PASSWORD)".to_string());
    }

    if let Some(ref key_path) = args.key {
        if !key_path.exists() {
            errors.push(format!("SSH key file not found: {}", key_path.display()));
        }
    }

    if let Some(ref known_hosts) = args.known_hosts {
        if !known_hosts.exists() {
            errors.push(format!(
                "known_hosts file not found: {}",
                known_hosts.display()
            ));
        }
    }

    if let Some(ref fp) = args.host_fingerprint {
        if args.known_hosts.is_some() {
            errors.push("--known-hosts and --host-fingerprint are mutually exclusive".to_string());
        }
        if let Err(e) = fp.trim().parse::<ssh_key::Fingerprint>() {
            errors.push(format!("Invalid host fingerprint '{}': {}", fp, e));
        } else if !fp.trim().starts_with("SHA256:") {
            errors.push(format!("Host fingerprint must be SHA256, got '{}'", fp));
        }
    }

    if args.connect_timeout == 0 {
        errors.push("--connect-timeout must be greater than 0".to_string());
    }

    if args.command_timeout == 0 {
        errors.push("--command-timeout must be greater than 0".to_string());
    }

    if !errors.is_empty() {
        return Err(GatewayError::Config(errors.join("\n")));
    }

    Ok(())
}

/// Treat empty secrets as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
