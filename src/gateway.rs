//! Execution façade
//!
//! Composes the catalog, the builder and a per-request [`RemoteSession`].
//! Input is validated completely before any connection is opened, so an
//! unknown name or a bad parameter never costs a network round-trip and a
//! partially validated command never reaches the host.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{GatewayError, Result};
use crate::ssh::{CommandResult, Connector, RemoteSession};
use crate::whitelist::{build_command, Catalog, Parameters};

/// Literal run by the connectivity self-test
pub const CONNECTION_TEST_COMMAND: &str = "echo 'SSH connection successful'";

/// Outcome of [`Gateway::test_connection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub ok: bool,
    pub message: String,
}

/// Runs whitelisted commands against one configured host
///
/// Holds no live connection: every call opens its own session and tears it
/// down before returning.
pub struct Gateway<C: Connector> {
    catalog: Arc<Catalog>,
    connector: C,
}

impl<C: Connector> Gateway<C> {
    pub fn new(catalog: Arc<Catalog>, connector: C) -> Self {
        Self { catalog, connector }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// A fresh, disconnected session to the configured host
    pub fn open_session(&self) -> RemoteSession<C::Transport> {
        RemoteSession::new(
            self.connector.transport(),
            self.connector.connect_timeout(),
            self.connector.command_timeout(),
        )
    }

    /// Look up `name` and build its command string without touching the transport
    pub fn prepare(&self, name: &str, parameters: Option<&Parameters>) -> Result<String> {
        let def = self
            .catalog
            .lookup(name)
            .ok_or_else(|| GatewayError::UnknownCommand(name.to_string()))?;

        let empty = Parameters::new();
        build_command(def, parameters.unwrap_or(&empty))
    }

    /// Run a whitelisted command by name
    pub async fn run_whitelisted(
        &self,
        name: &str,
        parameters: Option<&Parameters>,
    ) -> CommandResult {
        let command = match self.prepare(name, parameters) {
            Ok(command) => command,
            Err(e) => {
                warn!("Rejected command '{}': {}", name, e);
                return CommandResult::failed(name, &e);
            }
        };

        info!("Running whitelisted command '{}'", name);
        self.run_in_new_session(&command).await
    }

    /// Run several parameterless whitelisted commands over one session
    ///
    /// Names that fail validation get their failure result without a
    /// connection; the session is opened only if at least one is valid.
    /// After a timeout or transport failure the remaining commands report
    /// `SessionClosed` naming that failure. Results are returned in input
    /// order.
    pub async fn run_batch(&self, names: &[&str]) -> Vec<(String, CommandResult)> {
        let prepared: Vec<(&str, Result<String>)> = names
            .iter()
            .map(|name| (*name, self.prepare(name, None)))
            .collect();

        let mut session = None;
        if prepared.iter().any(|(_, built)| built.is_ok()) {
            let mut opened = self.open_session();
            match opened.connect().await {
                Ok(()) => session = Some(opened),
                Err(e) => {
                    return prepared
                        .into_iter()
                        .map(|(name, built)| {
                            let result = match built {
                                Ok(command) => CommandResult::failed(command, &e),
                                Err(invalid) => CommandResult::failed(name, &invalid),
                            };
                            (name.to_string(), result)
                        })
                        .collect();
                }
            }
        }

        let mut results = Vec::with_capacity(prepared.len());
        let mut closed_by = String::new();
        for (name, built) in prepared {
            let result = match (built, session.as_mut()) {
                (Ok(command), Some(session)) if session.is_connected() => {
                    let result = session.execute(&command, None).await;
                    if !session.is_connected() {
                        closed_by = result.error_message().unwrap_or_default().to_string();
                    }
                    result
                }
                (Ok(command), _) => CommandResult::failed(
                    command,
                    &GatewayError::SessionClosed(closed_by.clone()),
                ),
                (Err(e), _) => CommandResult::failed(name, &e),
            };
            results.push((name.to_string(), result));
        }

        if let Some(mut session) = session {
            session.disconnect().await;
        }
        results
    }

    /// Run a literal command, bypassing the catalog
    ///
    /// Reserved for fixed strings such as [`CONNECTION_TEST_COMMAND`].
    pub(crate) async fn run_raw(&self, command: &str) -> CommandResult {
        self.run_in_new_session(command).await
    }

    /// Connect, run the fixed self-test command, disconnect
    pub async fn test_connection(&self) -> ConnectionCheck {
        let target = self.connector.target();
        let result = self.run_raw(CONNECTION_TEST_COMMAND).await;

        if result.success() {
            ConnectionCheck {
                ok: true,
                message: format!("Connected to {}", target),
            }
        } else {
            let reason = result
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| result.stderr().trim().to_string());
            ConnectionCheck {
                ok: false,
                message: format!("Connection test failed: {}", reason),
            }
        }
    }

    async fn run_in_new_session(&self, command: &str) -> CommandResult {
        let mut session = self.open_session();

        if let Err(e) = session.connect().await {
            return CommandResult::failed(command, &e);
        }

        let result = session.execute(command, None).await;
        session.disconnect().await;
        debug!("Session for '{}' closed", command);
        result
    }
}
