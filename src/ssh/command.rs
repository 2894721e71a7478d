//! Command execution results
//!
//! [`CommandOutput`] is what the transport hands back for a command that ran
//! to completion. [`CommandResult`] is the normalized record returned to
//! callers for every execution attempt, whether or not anything ran.

use serde::Serialize;

use crate::error::{ErrorKind, GatewayError};

/// Exit code reported when the remote side never produced one
pub const NO_EXIT_CODE: i32 = -1;

/// Raw output of a command that ran on the remote host
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output bytes
    pub stdout: Vec<u8>,

    /// Standard error bytes
    pub stderr: Vec<u8>,

    /// Exit status, if the server sent one
    pub exit_status: Option<u32>,

    /// Signal that terminated the command, if any
    pub exit_signal: Option<String>,
}

impl CommandOutput {
    /// Create a new empty CommandOutput
    pub fn new() -> Self {
        Self::default()
    }
}

/// Normalized outcome of one execution attempt
///
/// Produced once and never modified. `success` is true only when the remote
/// command exited with status 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    command: String,
    stdout: String,
    stderr: String,
    exit_code: i32,
    success: bool,
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

impl CommandResult {
    /// Result of a command that ran to completion
    ///
    /// Output is decoded as UTF-8 with invalid sequences replaced.
    pub fn completed(command: impl Into<String>, output: CommandOutput) -> Self {
        let exit_code = output
            .exit_status
            .and_then(|status| i32::try_from(status).ok())
            .unwrap_or(NO_EXIT_CODE);

        let error_message = match (&output.exit_signal, output.exit_status) {
            (Some(signal), _) => Some(format!("Command terminated by signal {}", signal)),
            (None, None) => Some("Command finished without reporting an exit status".to_string()),
            _ => None,
        };

        Self {
            command: command.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            success: output.exit_status == Some(0),
            error_message,
            error_kind: None,
        }
    }

    /// Result of an attempt that failed before or during execution
    ///
    /// Transport errors also land in `stderr`, so callers that only look at
    /// the streams still see why.
    pub fn failed(command: impl Into<String>, error: &GatewayError) -> Self {
        let stderr = match error {
            GatewayError::Transport(msg) | GatewayError::Authentication(msg) => msg.clone(),
            _ => String::new(),
        };

        Self {
            command: command.into(),
            stdout: String::new(),
            stderr,
            exit_code: NO_EXIT_CODE,
            success: false,
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    /// The command string that was executed, or the requested name if
    /// nothing was built
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Why the attempt failed, when the failure was on the gateway side
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn output(stdout: &[u8], stderr: &[u8], exit_status: Option<u32>) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
            exit_status,
            exit_signal: None,
        }
    }

    #[test]
    fn test_completed_success() {
        let result = CommandResult::completed("hostname", output(b"web-01\n", b"", Some(0)));
        assert!(result.success());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.stdout(), "web-01\n");
        assert_eq!(result.error_message(), None);
        assert_eq!(result.error_kind(), None);
    }

    #[test]
    fn test_completed_non_zero_exit() {
        let result = CommandResult::completed(
            "systemctl status nope --no-pager",
            output(b"", b"Unit nope.service could not be found.\n", Some(4)),
        );
        assert!(!result.success());
        assert_eq!(result.exit_code(), 4);
        assert_eq!(result.stderr(), "Unit nope.service could not be found.\n");
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn test_completed_without_exit_status() {
        let result = CommandResult::completed("uptime", output(b"up", b"", None));
        assert!(!result.success());
        assert_eq!(result.exit_code(), NO_EXIT_CODE);
        assert!(result.error_message().is_some());
    }

    #[test]
    fn test_completed_by_signal() {
        let mut out = output(b"", b"", None);
        out.exit_signal = Some("KILL".to_string());
        let result = CommandResult::completed("ping -c 4 host", out);
        assert!(!result.success());
        assert_eq!(result.exit_code(), NO_EXIT_CODE);
        assert_eq!(
            result.error_message(),
            Some("Command terminated by signal KILL")
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let result = CommandResult::completed("cat", output(b"ok \xff\xfe end", b"", Some(0)));
        assert_eq!(result.stdout(), "ok \u{FFFD}\u{FFFD} end");
    }

    #[test]
    fn test_failed_timeout() {
        let err = GatewayError::Timeout(Duration::from_secs(30));
        let result = CommandResult::failed("du -sh /", &err);
        assert!(!result.success());
        assert_eq!(result.exit_code(), -1);
        assert_eq!(result.stderr(), "");
        assert_eq!(
            result.error_message(),
            Some("Command timed out after 30 seconds")
        );
        assert_eq!(result.error_kind(), Some(ErrorKind::Timeout));
    }

    #[test]
    fn test_failed_transport_fills_stderr() {
        let err = GatewayError::transport("connection reset by peer");
        let result = CommandResult::failed("uptime", &err);
        assert_eq!(result.stderr(), "connection reset by peer");
        assert_eq!(
            result.error_message(),
            Some("SSH error: connection reset by peer")
        );
    }

    #[test]
    fn test_serialized_shape() {
        let result = CommandResult::completed("whoami", output(b"ops\n", b"", Some(0)));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["command"], "whoami");
        assert_eq!(json["stdout"], "ops\n");
        assert_eq!(json["stderr"], "");
        assert_eq!(json["exit_code"], 0);
        assert_eq!(json["success"], true);
        assert!(json["error_message"].is_null());
        assert!(json.get("error_kind").is_none());
    }
}
