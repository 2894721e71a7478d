//! JSON envelopes returned by the tools

use serde_json::{json, Value};

use crate::ssh::CommandResult;
use crate::whitelist::{Category, CommandDefinition};

/// Envelope for a single command result
pub fn command_result(result: &CommandResult) -> Value {
    if result.success() {
        let mut output = result.stdout().trim();
        if output.is_empty() {
            output = "(no output)";
        }
        json!({
            "success": true,
            "command": result.command(),
            "output": output,
        })
    } else {
        let error = result
            .error_message()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| result.stderr());
        json!({
            "success": false,
            "command": result.command(),
            "error": error,
            "exit_code": result.exit_code(),
        })
    }
}

/// Envelope for an unknown command name
pub fn unknown_command<'a>(name: &str, available: impl Iterator<Item = &'a str>) -> Value {
    json!({
        "success": false,
        "error": format!("Unknown command '{}'", name),
        "hint": "Use 'list_commands' to see available commands",
        "available_commands": available.take(10).collect::<Vec<_>>(),
    })
}

/// Envelope for `list_commands`
pub fn command_list(commands: &[&CommandDefinition]) -> Value {
    let entries: Vec<Value> = commands
        .iter()
        .map(|def| {
            let mut entry = json!({
                "name": def.name,
                "description": def.description,
                "category": def.category,
            });
            if !def.parameters.is_empty() {
                entry["parameters"] = def
                    .parameters
                    .iter()
                    .map(|p| (p.name.clone(), Value::String(p.description.clone())))
                    .collect::<serde_json::Map<_, _>>()
                    .into();
            }
            if let Some(ref example) = def.example_usage {
                entry["example"] = Value::String(example.clone());
            }
            entry
        })
        .collect();

    json!({
        "count": entries.len(),
        "commands": entries,
    })
}

/// Envelope for an unrecognized category filter
pub fn unknown_category(name: &str) -> Value {
    json!({
        "error": format!("Unknown category '{}'", name),
        "valid_categories": Category::ALL.iter().map(Category::as_str).collect::<Vec<_>>(),
    })
}

/// Pretty-printed JSON text
pub fn to_text(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::ssh::CommandOutput;
    use std::time::Duration;

    fn completed(stdout: &str, status: u32) -> CommandResult {
        CommandResult::completed(
            "df -h",
            CommandOutput {
                stdout: stdout.as_bytes().to_vec(),
                stderr: b"df: /mnt: Permission denied\n".to_vec(),
                exit_status: Some(status),
                exit_signal: None,
            },
        )
    }

    #[test]
    fn test_success_envelope_trims_output() {
        let v = command_result(&completed("  Filesystem  Size\n\n", 0));
        assert_eq!(v["success"], true);
        assert_eq!(v["command"], "df -h");
        assert_eq!(v["output"], "Filesystem  Size");
    }

    #[test]
    fn test_success_envelope_empty_output() {
        let v = command_result(&completed("\n", 0));
        assert_eq!(v["output"], "(no output)");
    }

    #[test]
    fn test_failure_envelope_falls_back_to_stderr() {
        let v = command_result(&completed("", 1));
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "df: /mnt: Permission denied\n");
        assert_eq!(v["exit_code"], 1);
    }

    #[test]
    fn test_failure_envelope_prefers_error_message() {
        let result =
            CommandResult::failed("du -sh /", &GatewayError::Timeout(Duration::from_secs(2)));
        let v = command_result(&result);
        assert_eq!(v["error"], "Command timed out after 2 seconds");
        assert_eq!(v["exit_code"], -1);
    }

    #[test]
    fn test_unknown_command_caps_list() {
        let names: Vec<String> = (0..15).map(|i| format!("cmd{}", i)).collect();
        let v = unknown_command("bogus", names.iter().map(String::as_str));
        assert_eq!(v["available_commands"].as_array().unwrap().len(), 10);
        assert_eq!(v["error"], "Unknown command 'bogus'");
    }

    #[test]
    fn test_command_list_shape() {
        let def = CommandDefinition::new("du", Category::Disk, "size", "du -sh {path}")
            .with_param("path", "Path to measure");
        let plain = CommandDefinition::new("df", Category::Disk, "usage", "df -h");
        let v = command_list(&[&def, &plain]);

        assert_eq!(v["count"], 2);
        assert_eq!(v["commands"][0]["category"], "disk");
        assert_eq!(v["commands"][0]["parameters"]["path"], "Path to measure");
        assert!(v["commands"][1].get("parameters").is_none());
    }

    #[test]
    fn test_unknown_category_lists_valid() {
        let v = unknown_category("gpu");
        assert_eq!(v["valid_categories"].as_array().unwrap().len(), 7);
    }
}
