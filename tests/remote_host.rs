//! End-to-end tests against a throwaway OpenSSH container
//!
//! Needs a Docker daemon, so these are ignored by default:
//!
//! ```bash
//! cargo test --test remote_host -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

use remote_exec_mcp::{
    AuthMethod, Catalog, ErrorKind, Gateway, Parameters, SshConfig, SshConnector,
};

const USER: &str = "tester";
const PASSWORD: &str = "tester-password";
const SSH_PORT: u16 = 2222;

async fn start_sshd() -> (ContainerAsync<GenericImage>, SshConfig) {
    let container = GenericImage::new("linuxserver/openssh-server", "latest")
        .with_exposed_port(SSH_PORT.tcp())
        .with_wait_for(WaitFor::message_on_stdout("done."))
        .with_env_var("USER_NAME", USER)
        .with_env_var("USER_PASSWORD", PASSWORD)
        .with_env_var("PASSWORD_ACCESS", "true")
        .start()
        .await
        .expect("start openssh container");

    let host = container.get_host().await.expect("container host").to_string();
    let port = container
        .get_host_port_ipv4(SSH_PORT.tcp())
        .await
        .expect("mapped ssh port");

    let config = SshConfig::new(host, USER, AuthMethod::Password(PASSWORD.to_string()))
        .with_port(port)
        .with_connect_timeout(Duration::from_secs(10))
        .with_command_timeout(Duration::from_secs(10));

    (container, config)
}

fn gateway(config: SshConfig) -> Gateway<SshConnector> {
    Gateway::new(
        Arc::new(Catalog::builtin().unwrap()),
        SshConnector::new(config).unwrap(),
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_connection_against_sshd() {
    let (_container, config) = start_sshd().await;
    let check = gateway(config).test_connection().await;
    assert!(check.ok, "{}", check.message);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_whitelisted_command_runs() {
    let (_container, config) = start_sshd().await;
    let gw = gateway(config);

    let result = gw.run_whitelisted("whoami", None).await;
    assert!(result.success(), "{:?}", result);
    assert_eq!(result.stdout().trim(), USER);

    let params = Parameters::from([("path".to_string(), "/tmp".to_string())]);
    let result = gw.run_whitelisted("disk_usage_path", Some(&params)).await;
    assert!(result.success(), "{:?}", result);
    assert!(result.stdout().contains("/tmp"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_nonzero_exit_is_reported() {
    let (_container, config) = start_sshd().await;
    let params = Parameters::from([("path".to_string(), "/does/not/exist".to_string())]);

    let result = gateway(config)
        .run_whitelisted("disk_usage_path", Some(&params))
        .await;
    assert!(!result.success());
    assert_ne!(result.exit_code(), 0);
    assert!(!result.stderr().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_wrong_password_is_transport_error() {
    let (_container, config) = start_sshd().await;
    let config = SshConfig {
        auth: AuthMethod::Password("wrong".to_string()),
        ..config
    };

    let result = gateway(config).run_whitelisted("uptime", None).await;
    assert!(!result.success());
    assert_eq!(result.exit_code(), -1);
    assert_eq!(result.error_kind(), Some(ErrorKind::Transport));
}
