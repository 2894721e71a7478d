//! Remote session
//!
//! Wraps one [`Transport`] with the connected/disconnected state machine and
//! the deadlines. `execute` never returns an error: every failure is encoded
//! in the [`CommandResult`].
//!
//! ```text
//! disconnected --connect ok--> connected --disconnect--> disconnected
//!                               |  timeout / transport error  ^
//!                               +-----------------------------+
//! ```

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::command::CommandResult;
use super::transport::Transport;
use crate::error::{GatewayError, Result};

/// A single-owner session to one remote host
///
/// Dropping the session drops the transport, which releases any live
/// handle even if `disconnect` was never reached.
pub struct RemoteSession<T: Transport> {
    transport: T,
    connected: bool,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl<T: Transport> RemoteSession<T> {
    /// Create a disconnected session
    pub fn new(transport: T, connect_timeout: Duration, command_timeout: Duration) -> Self {
        Self {
            transport,
            connected: false,
            connect_timeout,
            command_timeout,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connect and authenticate, bounded by the connection timeout
    ///
    /// A no-op when already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.connected {
            debug!("Session already connected");
            return Ok(());
        }

        match timeout(self.connect_timeout, self.transport.open()).await {
            Ok(Ok(())) => {
                self.connected = true;
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Connection failed: {}", e);
                self.transport.close().await;
                Err(e)
            }
            Err(_) => {
                error!(
                    "Connection timed out after {}s",
                    self.connect_timeout.as_secs_f64()
                );
                self.transport.close().await;
                Err(GatewayError::transport(format!(
                    "Connection timed out after {} seconds",
                    self.connect_timeout.as_secs_f64()
                )))
            }
        }
    }

    /// Close the connection; a no-op when already disconnected
    pub async fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.transport.close().await;
        self.connected = false;
        debug!("Session disconnected");
    }

    /// Run `command` and wait up to `timeout_override`, or the session default
    ///
    /// On timeout or transport failure the session is torn down and left
    /// disconnected; the remote process is not killed.
    pub async fn execute(
        &mut self,
        command: &str,
        timeout_override: Option<Duration>,
    ) -> CommandResult {
        if !self.connected {
            warn!("execute called on a disconnected session");
            return CommandResult::failed(command, &GatewayError::NotConnected);
        }

        let deadline = timeout_override.unwrap_or(self.command_timeout);
        debug!("Executing command: {}", command);

        match timeout(deadline, self.transport.exec(command)).await {
            Ok(Ok(output)) => {
                let result = CommandResult::completed(command, output);
                info!(
                    "Command finished: exit_code={}, success={}",
                    result.exit_code(),
                    result.success()
                );
                result
            }
            Ok(Err(e)) => {
                error!("Command execution failed: {}", e);
                self.disconnect().await;
                CommandResult::failed(command, &e)
            }
            Err(_) => {
                warn!("Command timed out after {}s", deadline.as_secs_f64());
                self.disconnect().await;
                CommandResult::failed(command, &GatewayError::Timeout(deadline))
            }
        }
    }
}

impl<T: Transport> Drop for RemoteSession<T> {
    fn drop(&mut self) {
        if self.connected {
            debug!("Session dropped while connected, releasing transport");
        }
    }
}
