//! Remote exec MCP - whitelisted remote command execution over SSH
//!
//! An MCP server that lets an assistant run a fixed catalog of read-only
//! diagnostic commands on one remote Linux host. Callers pick a command by
//! name and may fill its `{placeholder}` parameters; parameter values are
//! checked against a strict character policy before anything is sent.
//!
//! # Layers
//!
//! - [`whitelist`] - command catalog and command builder
//! - [`ssh`] - parameter sanitizer, transport seam, russh transport and
//!   the [`RemoteSession`](ssh::RemoteSession) state machine
//! - [`gateway`] - validate, connect, execute, disconnect; one session per
//!   request
//! - [`server`] - MCP tools over stdio
//!
//! # Example Usage (CLI)
//!
//! ```bash
//! remote-exec-mcp --host=100.64.0.7 --user=ops --key=~/.ssh/id_ed25519
//! remote-exec-mcp --check
//! ```
//!
//! # Example Usage (library)
//!
//! ```no_run
//! use std::sync::Arc;
//! use remote_exec_mcp::{AuthMethod, Catalog, Gateway, SshConfig, SshConnector};
//!
//! # async fn demo() -> remote_exec_mcp::Result<()> {
//! let config = SshConfig::new("100.64.0.7", "ops", AuthMethod::Password("secret".into()));
//! let gateway = Gateway::new(Arc::new(Catalog::builtin()?), SshConnector::new(config)?);
//! let result = gateway.run_whitelisted("disk_usage", None).await;
//! println!("{}", result.stdout());
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod ssh;
pub mod tools;
pub mod whitelist;

// Re-exports for convenience
pub use config::{Args, Config};
pub use error::{ErrorKind, GatewayError, Result};
pub use gateway::{ConnectionCheck, Gateway};
pub use server::RemoteExecServer;
pub use ssh::{
    sanitize_parameter, AuthMethod, CommandResult, Connector, HostKeyPolicy, RemoteSession,
    SshConfig, SshConnector, Transport,
};
pub use whitelist::{build_command, Catalog, Category, CommandDefinition, Parameters};
