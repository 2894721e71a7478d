//! SSH execution layer
//!
//! Parameter sanitization, the transport seam with its russh
//! implementation, and the remote session that normalizes every execution
//! attempt into a [`CommandResult`].

pub mod command;
pub mod config;
pub mod connection;
pub mod handler;
pub mod sanitize;
pub mod session;
pub mod transport;

// Re-exports
pub use command::{CommandOutput, CommandResult, NO_EXIT_CODE};
pub use config::{AuthMethod, HostKeyPolicy, SshConfig};
pub use connection::{SshConnector, SshTransport};
pub use handler::SshHandler;
pub use sanitize::{sanitize_parameter, Rejection};
pub use session::RemoteSession;
pub use transport::{Connector, Transport};
