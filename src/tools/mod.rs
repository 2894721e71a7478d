//! MCP tool inputs
//!
//! One type per tool input shape plus an explicit `parse` for each. Parsing
//! rejects unknown fields, trims strings and enforces the length and pattern
//! limits; the types also derive `JsonSchema` for tool discovery.
//!
//! Available tools:
//! - `ping` - Echo a message back
//! - `server_status` - Server info and SSH connectivity
//! - `list_commands` - Whitelisted commands, optionally by category
//! - `execute_command` - Run a whitelisted command by name
//! - `check_disk`, `check_memory` - Shortcuts for `disk_usage` / `memory_usage`
//! - `check_service` - Shortcut for `service_status`
//! - `check_path_size` - Shortcut for `disk_usage_path`
//! - `system_overview` - hostname, uptime, memory and disk in one session

pub mod response;

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::whitelist::{Category, Parameters};

static SERVICE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static pattern is valid"));

static PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._/-]+$").expect("static pattern is valid"));

/// A tool input that failed to parse or validate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid arguments: {0}")]
    Malformed(String),

    #[error("'{field}' must be between {min} and {max} characters, got {len}")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        len: usize,
    },

    #[error("'{field}' must match {pattern}")]
    Pattern {
        field: &'static str,
        pattern: &'static str,
    },
}

/// Parameters for the ping tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PingInput {
    /// Optional message to echo back (default: 'ping')
    #[serde(default)]
    pub message: Option<String>,
}

/// Parameters for the list_commands tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListCommandsInput {
    /// Filter by category: system, disk, network, process, service, docker, custom
    #[serde(default)]
    pub category: Option<String>,
}

/// Parameters for the execute_command tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExecuteCommandInput {
    /// Name of the whitelisted command to execute (e.g., 'disk_usage', 'memory_usage')
    pub command_name: String,

    /// Optional parameters for commands that need them (e.g., {"path": "/var/log"})
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

/// Parameters for the check_service tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ServiceStatusInput {
    /// Name of the systemd service to check (e.g., 'nginx', 'docker', 'ssh')
    pub service_name: String,
}

/// Parameters for the check_path_size tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DiskUsagePathInput {
    /// Path to check disk usage for (e.g., '/var/log', '/home')
    pub path: String,
}

/// Tools that take no arguments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoInput {}

/// Deserialize `args`, rejecting unknown fields
fn from_args<T: DeserializeOwned>(args: JsonObject) -> Result<T, InputError> {
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| InputError::Malformed(e.to_string()))
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), InputError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(InputError::Length {
            field,
            min,
            max,
            len,
        });
    }
    Ok(())
}

fn check_pattern(
    field: &'static str,
    value: &str,
    regex: &Regex,
    pattern: &'static str,
) -> Result<(), InputError> {
    if !regex.is_match(value) {
        return Err(InputError::Pattern { field, pattern });
    }
    Ok(())
}

impl PingInput {
    pub const DEFAULT_MESSAGE: &'static str = "ping";
    pub const MAX_MESSAGE_LEN: usize = 100;

    pub fn parse(args: JsonObject) -> Result<Self, InputError> {
        let input: Self = from_args(args)?;
        let message = match input.message {
            Some(m) => {
                let m = m.trim().to_string();
                check_length("message", &m, 0, Self::MAX_MESSAGE_LEN)?;
                m
            }
            None => Self::DEFAULT_MESSAGE.to_string(),
        };
        Ok(Self {
            message: Some(message),
        })
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(Self::DEFAULT_MESSAGE)
    }
}

impl ListCommandsInput {
    pub fn parse(args: JsonObject) -> Result<Self, InputError> {
        let input: Self = from_args(args)?;
        Ok(Self {
            category: input
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }

    /// The requested category; `Err` carries the unrecognized name
    pub fn category(&self) -> Result<Option<Category>, String> {
        match &self.category {
            Some(name) => name.parse::<Category>().map(Some).map_err(|_| name.clone()),
            None => Ok(None),
        }
    }
}

impl ExecuteCommandInput {
    pub const MAX_NAME_LEN: usize = 50;

    pub fn parse(args: JsonObject) -> Result<Self, InputError> {
        let input: Self = from_args(args)?;
        let command_name = input.command_name.trim().to_string();
        check_length("command_name", &command_name, 1, Self::MAX_NAME_LEN)?;

        let parameters = input.parameters.map(|params| {
            params
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .collect()
        });

        Ok(Self {
            command_name,
            parameters,
        })
    }
}

impl ServiceStatusInput {
    pub const MAX_LEN: usize = 50;

    pub fn parse(args: JsonObject) -> Result<Self, InputError> {
        let input: Self = from_args(args)?;
        let service_name = input.service_name.trim().to_string();
        check_length("service_name", &service_name, 1, Self::MAX_LEN)?;
        check_pattern(
            "service_name",
            &service_name,
            &SERVICE_NAME,
            r"^[a-zA-Z0-9_-]+$",
        )?;
        Ok(Self { service_name })
    }
}

impl DiskUsagePathInput {
    pub const MAX_LEN: usize = 200;

    pub fn parse(args: JsonObject) -> Result<Self, InputError> {
        let input: Self = from_args(args)?;
        let path = input.path.trim().to_string();
        check_length("path", &path, 1, Self::MAX_LEN)?;
        check_pattern("path", &path, &PATH, r"^[a-zA-Z0-9._/-]+$")?;
        Ok(Self { path })
    }
}

impl NoInput {
    pub fn parse(args: JsonObject) -> Result<Self, InputError> {
        from_args(args)
    }
}

/// JSON schema of `T` as an MCP tool input schema
pub fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    let schema_obj = serde_json::to_value(schema)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    Arc::new(schema_obj)
}
