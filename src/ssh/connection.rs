//! russh-backed transport
//!
//! [`SshTransport`] owns at most one authenticated russh session. Each
//! command runs on its own exec channel; output is collected until the
//! server closes the channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::keys::PrivateKeyWithHashAlg;
use russh::ChannelMsg;
use tokio::time::timeout;
use tracing::{debug, info};

use super::command::CommandOutput;
use super::config::{AuthMethod, SshConfig};
use super::handler::SshHandler;
use super::transport::{Connector, Transport};
use crate::error::{GatewayError, Result};

/// Upper bound on a graceful disconnect
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A connection to the configured host
pub struct SshTransport {
    /// SSH configuration
    config: Arc<SshConfig>,

    /// Active SSH session handle
    session: Option<Handle<SshHandler>>,
}

impl SshTransport {
    pub fn new(config: Arc<SshConfig>) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Authenticate with the SSH server
    async fn authenticate(&self, session: &mut Handle<SshHandler>) -> Result<()> {
        let username = &self.config.username;

        let auth_result = match &self.config.auth {
            AuthMethod::Key(key) => {
                debug!("Attempting key authentication for user '{}'", username);

                // Best RSA hash the server supports; ignored for other key types
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .ok()
                    .flatten()
                    .flatten();
                let key_with_alg = PrivateKeyWithHashAlg::new(key.clone(), hash_alg);

                session
                    .authenticate_publickey(username, key_with_alg)
                    .await
                    .map_err(|e| GatewayError::auth(e.to_string()))?
            }
            AuthMethod::Password(password) => {
                debug!("Attempting password authentication for user '{}'", username);
                session
                    .authenticate_password(username, password)
                    .await
                    .map_err(|e| GatewayError::auth(e.to_string()))?
            }
        };

        if auth_result.success() {
            info!("Authenticated as '{}'", username);
            Ok(())
        } else {
            Err(GatewayError::auth(format!(
                "server rejected credentials for '{}'",
                username
            )))
        }
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        info!(
            "Connecting to SSH server {}:{}...",
            self.config.host, self.config.port
        );

        let ssh_config = Arc::new(client::Config::default());
        let handler = SshHandler::new(
            self.config.host.clone(),
            self.config.port,
            self.config.host_key.clone(),
        );

        let mut session = client::connect(
            ssh_config,
            (self.config.host.as_str(), self.config.port),
            handler,
        )
        .await
        .map_err(|e| {
            GatewayError::transport(format!("cannot reach {}: {}", self.config.target(), e))
        })?;

        self.authenticate(&mut session).await?;

        info!("Successfully connected to {}", self.config.target());
        self.session = Some(session);
        Ok(())
    }

    async fn exec(&mut self, command: &str) -> Result<CommandOutput> {
        let session = self.session.as_ref().ok_or(GatewayError::NotConnected)?;

        let mut channel = session
            .channel_open_session()
            .await
            .map_err(|e| GatewayError::transport(format!("Failed to open channel: {}", e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| GatewayError::transport(format!("Failed to exec command: {}", e)))?;

        let mut output = CommandOutput::new();
        let mut closed = false;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => {
                    output.stdout.extend_from_slice(&data);
                }
                ChannelMsg::ExtendedData { data, ext } => {
                    // ext == 1 is stderr
                    if ext == 1 {
                        output.stderr.extend_from_slice(&data);
                    } else {
                        output.stdout.extend_from_slice(&data);
                    }
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    output.exit_status = Some(exit_status);
                }
                ChannelMsg::ExitSignal { signal_name, .. } => {
                    output.exit_signal = Some(format!("{:?}", signal_name));
                }
                ChannelMsg::Close => {
                    closed = true;
                    break;
                }
                // Exit status may still follow EOF
                _ => {}
            }
        }

        if !closed && output.exit_status.is_none() && output.exit_signal.is_none() {
            return Err(GatewayError::transport(
                "Channel ended before the command completed",
            ));
        }

        debug!(
            "Command completed: exit_status={:?}, stdout_len={}, stderr_len={}",
            output.exit_status,
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(output)
    }

    async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = timeout(
                DISCONNECT_TIMEOUT,
                session.disconnect(russh::Disconnect::ByApplication, "", "en"),
            )
            .await;
            info!("SSH connection to {} closed", self.config.target());
        }
    }
}

impl std::fmt::Debug for SshTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshTransport")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("username", &self.config.username)
            .field("connected", &self.session.is_some())
            .finish()
    }
}

/// Produces [`SshTransport`]s for one configured host
#[derive(Debug, Clone)]
pub struct SshConnector {
    config: Arc<SshConfig>,
}

impl SshConnector {
    /// Fails if the host or username is empty
    pub fn new(config: SshConfig) -> Result<Self> {
        if config.host.trim().is_empty() {
            return Err(GatewayError::config("SSH host must not be empty"));
        }
        if config.username.trim().is_empty() {
            return Err(GatewayError::config("SSH username must not be empty"));
        }
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }
}

impl Connector for SshConnector {
    type Transport = SshTransport;

    fn transport(&self) -> SshTransport {
        SshTransport::new(self.config.clone())
    }

    fn target(&self) -> String {
        self.config.target()
    }

    fn connect_timeout(&self) -> Duration {
        self.config.connect_timeout
    }

    fn command_timeout(&self) -> Duration {
        self.config.command_timeout
    }
}
