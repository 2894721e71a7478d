//! Transport seam
//!
//! [`Transport`] is one connection to one host. [`Connector`] produces fresh,
//! unconnected transports; the gateway asks it for one per request.

use async_trait::async_trait;

use super::command::CommandOutput;
use crate::error::Result;

/// A single connection to a remote host
#[async_trait]
pub trait Transport: Send {
    /// Connect and authenticate
    async fn open(&mut self) -> Result<()>;

    /// Run `command` to completion and collect its output
    ///
    /// Only called between a successful `open` and the next `close`.
    async fn exec(&mut self, command: &str) -> Result<CommandOutput>;

    /// Release the connection; must be safe to call more than once
    async fn close(&mut self);
}

/// Factory for transports to one configured host
pub trait Connector: Send + Sync {
    type Transport: Transport + 'static;

    /// A new, unconnected transport
    fn transport(&self) -> Self::Transport;

    /// `user@host:port` of the configured target
    fn target(&self) -> String;

    /// Deadline for `open`
    fn connect_timeout(&self) -> std::time::Duration;

    /// Deadline for `exec` when the caller gives none
    fn command_timeout(&self) -> std::time::Duration;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transport for tests

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{Connector, Transport};
    use crate::error::{GatewayError, Result};
    use crate::ssh::command::CommandOutput;

    /// Call counters shared between a connector and its transports
    #[derive(Debug, Default)]
    pub struct Calls {
        pub opens: AtomicUsize,
        pub execs: AtomicUsize,
        pub closes: AtomicUsize,
        pub drops: AtomicUsize,
        pub commands: Mutex<Vec<String>>,
    }

    impl Calls {
        pub fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }

        pub fn execs(&self) -> usize {
            self.execs.load(Ordering::SeqCst)
        }

        pub fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }

        /// Transports released by drop, whether or not `close` ran
        pub fn drops(&self) -> usize {
            self.drops.load(Ordering::SeqCst)
        }

        pub fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    /// What the mock does when asked to open or exec
    #[derive(Debug, Clone)]
    pub struct Script {
        pub open_error: Option<String>,
        pub open_delay: Duration,
        pub exec_delay: Duration,
        pub exec_error: Option<String>,
        pub stdout: Vec<u8>,
        pub stderr: Vec<u8>,
        pub exit_status: Option<u32>,
    }

    impl Default for Script {
        fn default() -> Self {
            Self {
                open_error: None,
                open_delay: Duration::ZERO,
                exec_delay: Duration::ZERO,
                exec_error: None,
                stdout: b"ok\n".to_vec(),
                stderr: Vec::new(),
                exit_status: Some(0),
            }
        }
    }

    pub struct MockTransport {
        script: Script,
        calls: Arc<Calls>,
        open: bool,
    }

    impl MockTransport {
        pub fn new(script: Script) -> (Self, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            (
                Self {
                    script,
                    calls: calls.clone(),
                    open: false,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn open(&mut self) -> Result<()> {
            self.calls.opens.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.script.open_delay).await;
            if let Some(ref msg) = self.script.open_error {
                return Err(GatewayError::transport(msg.clone()));
            }
            self.open = true;
            Ok(())
        }

        async fn exec(&mut self, command: &str) -> Result<CommandOutput> {
            assert!(self.open, "exec on a closed mock transport");
            self.calls.execs.fetch_add(1, Ordering::SeqCst);
            self.calls.commands.lock().unwrap().push(command.to_string());
            tokio::time::sleep(self.script.exec_delay).await;
            if let Some(ref msg) = self.script.exec_error {
                return Err(GatewayError::transport(msg.clone()));
            }
            Ok(CommandOutput {
                stdout: self.script.stdout.clone(),
                stderr: self.script.stderr.clone(),
                exit_status: self.script.exit_status,
                exit_signal: None,
            })
        }

        async fn close(&mut self) {
            self.calls.closes.fetch_add(1, Ordering::SeqCst);
            self.open = false;
        }
    }

    impl Drop for MockTransport {
        fn drop(&mut self) {
            self.calls.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct MockConnector {
        pub script: Script,
        pub calls: Arc<Calls>,
        pub connect_timeout: Duration,
        pub command_timeout: Duration,
    }

    impl MockConnector {
        pub fn new(script: Script) -> Self {
            Self {
                script,
                calls: Arc::new(Calls::default()),
                connect_timeout: Duration::from_secs(5),
                command_timeout: Duration::from_secs(5),
            }
        }
    }

    impl Connector for MockConnector {
        type Transport = MockTransport;

        fn transport(&self) -> MockTransport {
            MockTransport {
                script: self.script.clone(),
                calls: self.calls.clone(),
                open: false,
            }
        }

        fn target(&self) -> String {
            "tester@mock:22".to_string()
        }

        fn connect_timeout(&self) -> Duration {
            self.connect_timeout
        }

        fn command_timeout(&self) -> Duration {
            self.command_timeout
        }
    }
}
