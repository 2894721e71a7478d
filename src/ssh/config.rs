//! SSH configuration types
//!
//! Resolved, immutable connection parameters handed to the transport.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use russh::keys::PrivateKey;

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default command timeout
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// How the client proves its identity
#[derive(Clone)]
pub enum AuthMethod {
    /// Decoded private key
    Key(Arc<PrivateKey>),

    /// Password authentication
    Password(String),
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Key(key) => f
                .debug_tuple("Key")
                .field(&key.algorithm().as_str())
                .finish(),
            AuthMethod::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
        }
    }
}

/// How the server's host key is verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept any host key
    AcceptAny,

    /// Verify against an OpenSSH known_hosts file
    KnownHosts(PathBuf),

    /// Require this exact `SHA256:` fingerprint
    Fingerprint(String),
}

/// SSH connection configuration
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Remote hostname or IP address
    pub host: String,

    /// SSH port (default: 22)
    pub port: u16,

    /// Username for authentication
    pub username: String,

    /// Authentication method
    pub auth: AuthMethod,

    /// Host key verification
    pub host_key: HostKeyPolicy,

    /// Deadline for connecting and authenticating
    pub connect_timeout: Duration,

    /// Deadline for a command when the caller gives none
    pub command_timeout: Duration,
}

impl SshConfig {
    /// Create a new SSH configuration with minimal required fields
    pub fn new(host: impl Into<String>, username: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            auth,
            host_key: HostKeyPolicy::AcceptAny,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the SSH port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the host key verification policy
    pub fn with_host_key(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key = policy;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the default command timeout
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// `user@host:port`
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}
