//! `--check`: verify configuration and connectivity, then exit
//!
//! Prints one line per step to the given writer (stderr from `main`) and
//! stops at the first step that fails.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::debug;

use crate::config::{Args, Config};
use crate::gateway::Gateway;
use crate::ssh::{Connector, SshConnector};
use crate::whitelist::{Catalog, Category};

const OK: &str = "[ok]";
const FAIL: &str = "[FAIL]";

/// Run every setup step; `Ok(true)` when all of them pass
pub async fn run<W: Write>(args: Args, out: &mut W) -> io::Result<bool> {
    writeln!(out, "Remote exec MCP setup check (v{})", env!("CARGO_PKG_VERSION"))?;

    let config = match Config::from_args(args) {
        Ok(config) => {
            writeln!(out, "{} Configuration: {}", OK, config.target())?;
            config
        }
        Err(e) => {
            writeln!(out, "{} Configuration:", FAIL)?;
            for line in e.to_string().lines() {
                writeln!(out, "    {}", line)?;
            }
            return Ok(false);
        }
    };

    let ssh_config = match config.ssh_config().await {
        Ok(ssh_config) => {
            let method = if config.key.is_some() { "key" } else { "password" };
            writeln!(out, "{} Credentials: {} authentication", OK, method)?;
            ssh_config
        }
        Err(e) => {
            writeln!(out, "{} Credentials: {}", FAIL, e)?;
            return Ok(false);
        }
    };

    let catalog = match Catalog::builtin() {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            writeln!(out, "{} Command catalog: {}", FAIL, e)?;
            return Ok(false);
        }
    };

    let connector = match SshConnector::new(ssh_config) {
        Ok(connector) => connector,
        Err(e) => {
            writeln!(out, "{} Configuration: {}", FAIL, e)?;
            return Ok(false);
        }
    };

    let gateway = Gateway::new(catalog, connector);
    verify_gateway(&gateway, out).await
}

/// Catalog summary plus a live connection test
pub async fn verify_gateway<C: Connector, W: Write>(
    gateway: &Gateway<C>,
    out: &mut W,
) -> io::Result<bool> {
    let catalog = gateway.catalog();
    writeln!(out, "{} Command catalog: {} commands", OK, catalog.len())?;
    for category in Category::ALL {
        let count = catalog.list(Some(category)).len();
        if count > 0 {
            writeln!(out, "    {:<8} {}", category.as_str(), count)?;
        }
    }

    debug!("Testing connection to {}", gateway.connector().target());
    let check = gateway.test_connection().await;
    let mark = if check.ok { OK } else { FAIL };
    writeln!(out, "{} SSH: {}", mark, check.message)?;

    if check.ok {
        writeln!(out, "Setup looks good.")?;
    }
    Ok(check.ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::transport::mock::{MockConnector, Script};
    use clap::Parser;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_config_stops_early() {
        let args = Args::try_parse_from(["remote-exec-mcp", "--host", "box"]).unwrap();
        let mut buf = Vec::new();
        let ok = run(args, &mut buf).await.unwrap();
        let text = output(buf);

        assert!(!ok);
        assert!(text.contains("[FAIL] Configuration:"));
        assert!(text.contains("--user"));
        assert!(!text.contains("SSH:"));
    }

    #[tokio::test]
    async fn test_verify_gateway_success() {
        let gw = Gateway::new(
            Arc::new(Catalog::builtin().unwrap()),
            MockConnector::new(Script::default()),
        );
        let mut buf = Vec::new();
        assert!(verify_gateway(&gw, &mut buf).await.unwrap());

        let text = output(buf);
        assert!(text.contains("[ok] SSH: Connected to tester@mock:22"));
        assert!(text.contains("docker"));
        assert!(text.ends_with("Setup looks good.\n"));
    }

    #[tokio::test]
    async fn test_verify_gateway_failure() {
        let gw = Gateway::new(
            Arc::new(Catalog::builtin().unwrap()),
            MockConnector::new(Script {
                open_error: Some("Connection refused".to_string()),
                ..Script::default()
            }),
        );
        let mut buf = Vec::new();
        assert!(!verify_gateway(&gw, &mut buf).await.unwrap());
        assert!(output(buf).contains("[FAIL] SSH: Connection test failed"));
    }
}
