//! Remote exec MCP server - Entry point
//!
//! Parses CLI arguments (or the environment / `.env`), builds the gateway,
//! and either runs the setup check or serves MCP on stdio until the client
//! disconnects or a shutdown signal arrives.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rmcp::service::ServiceExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use remote_exec_mcp::check;
use remote_exec_mcp::config::{Args, Config};
use remote_exec_mcp::error::{GatewayError, Result};
use remote_exec_mcp::gateway::Gateway;
use remote_exec_mcp::server::RemoteExecServer;
use remote_exec_mcp::ssh::SshConnector;
use remote_exec_mcp::whitelist::Catalog;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout carries MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.check {
        let ok = check::run(args, &mut std::io::stderr()).await?;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let config = Config::from_args(args)?;

    info!("Remote exec MCP v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Target: {}", config.target());
    info!(
        "Timeouts: connect {}s, command {}s",
        config.connect_timeout.as_secs(),
        config.command_timeout.as_secs()
    );

    let catalog = Arc::new(Catalog::builtin()?);
    info!("{} whitelisted commands loaded", catalog.len());

    let connector = SshConnector::new(config.ssh_config().await?)?;
    let server = RemoteExecServer::new(Gateway::new(catalog, connector));

    let running = match server.serve(rmcp::transport::io::stdio()).await {
        Ok(running) => running,
        Err(e) => {
            error!("Failed to start MCP server: {}", e);
            return Err(GatewayError::transport(e.to_string()));
        }
    };

    info!("MCP server running on stdio");

    tokio::select! {
        result = running.waiting() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {}
    }

    info!("Remote exec MCP stopped");

    Ok(ExitCode::SUCCESS)
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let sigterm = async {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!("Failed to register SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down...");
        }
        _ = sigterm => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
