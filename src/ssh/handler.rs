//! SSH client handler implementation
//!
//! Implements the `russh::client::Handler` trait; its only job is host key
//! verification according to the configured [`HostKeyPolicy`].

use russh::keys::{HashAlg, PublicKey};
use tracing::{debug, warn};

use super::config::HostKeyPolicy;

/// SSH client handler for russh
#[derive(Debug, Clone)]
pub struct SshHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
}

impl SshHandler {
    /// Create a new SSH handler verifying `host:port` with `policy`
    pub fn new(host: impl Into<String>, port: u16, policy: HostKeyPolicy) -> Self {
        Self {
            host: host.into(),
            port,
            policy,
        }
    }

    /// Decide whether the presented key is acceptable
    pub fn verify(&self, server_public_key: &PublicKey) -> anyhow::Result<bool> {
        let fingerprint = server_public_key.fingerprint(HashAlg::Sha256).to_string();

        match &self.policy {
            HostKeyPolicy::AcceptAny => {
                warn!(
                    "Accepting unverified host key {} for {}:{}",
                    fingerprint, self.host, self.port
                );
                Ok(true)
            }
            HostKeyPolicy::Fingerprint(expected) => {
                let matches = fingerprint == *expected;
                if !matches {
                    warn!(
                        "Host key mismatch for {}:{}: expected {}, got {}",
                        self.host, self.port, expected, fingerprint
                    );
                }
                Ok(matches)
            }
            HostKeyPolicy::KnownHosts(path) => {
                // Err means the host is listed with a different key
                let known = russh::keys::check_known_hosts_path(
                    &self.host,
                    self.port,
                    server_public_key,
                    path,
                )?;
                if known {
                    debug!("Host key for {}:{} found in known_hosts", self.host, self.port);
                } else {
                    warn!(
                        "Host {}:{} not present in {}",
                        self.host,
                        self.port,
                        path.display()
                    );
                }
                Ok(known)
            }
        }
    }
}

impl russh::client::Handler for SshHandler {
    type Error = anyhow::Error;

    /// Verify the server's host key
    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        self.verify(server_public_key)
    }
}
