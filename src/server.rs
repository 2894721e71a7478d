//! MCP Server implementation
//!
//! Exposes the gateway as MCP tools over stdio. This layer only parses
//! tool inputs, calls the [`Gateway`] and wraps results in JSON envelopes;
//! all command validation happens in the gateway.

use std::sync::Arc;

use rmcp::{
    handler::server::ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::gateway::Gateway;
use crate::ssh::{Connector, SshConnector};
use crate::tools::{
    input_schema, response, DiskUsagePathInput, ExecuteCommandInput, InputError,
    ListCommandsInput, NoInput, PingInput, ServiceStatusInput,
};
use crate::whitelist::{Category, Parameters};

/// Name reported to MCP clients
pub const SERVER_NAME: &str = "remote_exec_mcp";

/// Commands run by `system_overview`, in output order
pub const OVERVIEW_COMMANDS: [&str; 4] = ["hostname", "uptime", "memory_usage", "disk_usage"];

/// Remote exec MCP server
///
/// Cheap to clone; clones share the gateway.
pub struct RemoteExecServer<C: Connector = SshConnector> {
    gateway: Arc<Gateway<C>>,
}

impl<C: Connector> Clone for RemoteExecServer<C> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<C: Connector + 'static> RemoteExecServer<C> {
    pub fn new(gateway: Gateway<C>) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    pub fn gateway(&self) -> &Gateway<C> {
        &self.gateway
    }

    /// Tool definitions, in listing order
    pub fn tools() -> Vec<Tool> {
        vec![
            Tool::new(
                "ping",
                "Test if the MCP server is responding. Returns 'pong' with your message.",
                input_schema::<PingInput>(),
            ),
            Tool::new(
                "server_status",
                "Get server status, SSH connectivity and the number of available commands.",
                input_schema::<NoInput>(),
            ),
            Tool::new(
                "list_commands",
                "List the whitelisted commands that can be executed, optionally filtered by category.",
                input_schema::<ListCommandsInput>(),
            ),
            Tool::new(
                "execute_command",
                "Execute a whitelisted command on the remote server. Use 'list_commands' first to see names and parameters.",
                input_schema::<ExecuteCommandInput>(),
            ),
            Tool::new(
                "check_disk",
                "Disk space usage of all mounted filesystems (df -h).",
                input_schema::<NoInput>(),
            ),
            Tool::new(
                "check_memory",
                "RAM and swap usage (free -h).",
                input_schema::<NoInput>(),
            ),
            Tool::new(
                "check_service",
                "Status of a systemd service such as nginx, docker or ssh.",
                input_schema::<ServiceStatusInput>(),
            ),
            Tool::new(
                "check_path_size",
                "Total size of a directory or file (du -sh).",
                input_schema::<DiskUsagePathInput>(),
            ),
            Tool::new(
                "system_overview",
                "Hostname, uptime, memory and disk usage in a single call.",
                input_schema::<NoInput>(),
            ),
        ]
    }

    /// Route a tool call to its handler and render the JSON reply
    ///
    /// `Ok((value, is_error))` for everything the tool itself reports;
    /// `Err` only for unknown tools and malformed arguments.
    pub async fn dispatch(
        &self,
        tool_name: &str,
        args: JsonObject,
    ) -> std::result::Result<(Value, bool), McpError> {
        match tool_name {
            "ping" => {
                let input = PingInput::parse(args).map_err(invalid_params)?;
                Ok((self.ping(&input), false))
            }
            "server_status" => {
                NoInput::parse(args).map_err(invalid_params)?;
                Ok((self.server_status().await, false))
            }
            "list_commands" => {
                let input = ListCommandsInput::parse(args).map_err(invalid_params)?;
                Ok(self.list_commands(&input))
            }
            "execute_command" => {
                let input = ExecuteCommandInput::parse(args).map_err(invalid_params)?;
                Ok(self.execute_command(&input).await)
            }
            "check_disk" => {
                NoInput::parse(args).map_err(invalid_params)?;
                Ok(self.run("disk_usage", None).await)
            }
            "check_memory" => {
                NoInput::parse(args).map_err(invalid_params)?;
                Ok(self.run("memory_usage", None).await)
            }
            "check_service" => {
                let input = ServiceStatusInput::parse(args).map_err(invalid_params)?;
                let params = Parameters::from([("service_name".to_string(), input.service_name)]);
                Ok(self.run("service_status", Some(&params)).await)
            }
            "check_path_size" => {
                let input = DiskUsagePathInput::parse(args).map_err(invalid_params)?;
                let params = Parameters::from([("path".to_string(), input.path)]);
                Ok(self.run("disk_usage_path", Some(&params)).await)
            }
            "system_overview" => {
                NoInput::parse(args).map_err(invalid_params)?;
                Ok((self.system_overview().await, false))
            }
            _ => Err(McpError::invalid_params(
                format!("Unknown tool: {}", tool_name),
                None,
            )),
        }
    }

    fn ping(&self, input: &PingInput) -> Value {
        json!({
            "status": "pong",
            "message": input.message(),
            "server": SERVER_NAME,
        })
    }

    async fn server_status(&self) -> Value {
        let check = self.gateway.test_connection().await;
        let ssh_status = if check.ok {
            "connected".to_string()
        } else {
            format!("error: {}", check.message)
        };

        json!({
            "server_name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "status": "healthy",
            "ssh": {
                "status": ssh_status,
                "host": self.gateway.connector().target(),
            },
            "available_command_count": self.gateway.catalog().len(),
            "categories": Category::ALL.iter().map(Category::as_str).collect::<Vec<_>>(),
        })
    }

    fn list_commands(&self, input: &ListCommandsInput) -> (Value, bool) {
        match input.category() {
            Ok(category) => (
                response::command_list(&self.gateway.catalog().list(category)),
                false,
            ),
            Err(name) => (response::unknown_category(&name), true),
        }
    }

    async fn execute_command(&self, input: &ExecuteCommandInput) -> (Value, bool) {
        let catalog = self.gateway.catalog();
        if catalog.lookup(&input.command_name).is_none() {
            return (
                response::unknown_command(&input.command_name, catalog.names()),
                true,
            );
        }
        self.run(&input.command_name, input.parameters.as_ref()).await
    }

    async fn run(&self, name: &str, parameters: Option<&Parameters>) -> (Value, bool) {
        let result = self.gateway.run_whitelisted(name, parameters).await;
        (response::command_result(&result), !result.success())
    }

    async fn system_overview(&self) -> Value {
        let results = self.gateway.run_batch(&OVERVIEW_COMMANDS).await;

        let mut system = serde_json::Map::new();
        for (name, result) in results {
            let text = if result.success() {
                result.stdout().trim().to_string()
            } else {
                format!("Error: {}", result.error_message().unwrap_or(result.stderr()))
            };
            system.insert(name, Value::String(text));
        }

        json!({
            "success": true,
            "system": system,
        })
    }
}

fn invalid_params(e: InputError) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

impl<C: Connector + 'static> ServerHandler for RemoteExecServer<C> {
    /// Return server information
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Remote exec MCP server v{} - runs whitelisted diagnostic commands on {}. \
                 Call 'list_commands' to see what is available.",
                env!("CARGO_PKG_VERSION"),
                self.gateway.connector().target(),
            )),
        }
    }

    /// List available tools
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        debug!("list_tools called");

        Ok(ListToolsResult {
            tools: Self::tools(),
            next_cursor: None,
            meta: Default::default(),
        })
    }

    /// Call a tool
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tool_name: &str = request.name.as_ref();
        info!("call_tool: {}", tool_name);

        let args = request.arguments.unwrap_or_default();
        let (value, is_error) = self.dispatch(tool_name, args).await?;
        let content = vec![Content::text(response::to_text(&value))];

        if is_error {
            Ok(CallToolResult::error(content))
        } else {
            Ok(CallToolResult::success(content))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::transport::mock::{MockConnector, Script};
    use crate::whitelist::Catalog;

    fn server(script: Script) -> RemoteExecServer<MockConnector> {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        RemoteExecServer::new(Gateway::new(catalog, MockConnector::new(script)))
    }

    fn obj(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tool_definitions() {
        let tools = RemoteExecServer::<MockConnector>::tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(
            names,
            vec![
                "ping",
                "server_status",
                "list_commands",
                "execute_command",
                "check_disk",
                "check_memory",
                "check_service",
                "check_path_size",
                "system_overview",
            ]
        );
        assert!(tools.iter().all(|t| t.description.is_some()));
    }

    #[tokio::test]
    async fn test_ping() {
        let srv = server(Script::default());
        let (value, is_error) = srv.dispatch("ping", obj(json!({"message": "hi"}))).await.unwrap();
        assert!(!is_error);
        assert_eq!(value["status"], "pong");
        assert_eq!(value["message"], "hi");
        assert_eq!(srv.gateway().connector().calls.opens(), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let srv = server(Script::default());
        assert!(srv.dispatch("exec", JsonObject::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_execute_command_unknown_name() {
        let srv = server(Script::default());
        let (value, is_error) = srv
            .dispatch("execute_command", obj(json!({"command_name": "rm_everything"})))
            .await
            .unwrap();
        assert!(is_error);
        assert_eq!(value["error"], "Unknown command 'rm_everything'");
        assert_eq!(value["available_commands"].as_array().unwrap().len(), 10);
        assert_eq!(srv.gateway().connector().calls.opens(), 0);
    }

    #[tokio::test]
    async fn test_execute_command_runs() {
        let srv = server(Script {
            stdout: b"4.0K\t/tmp\n".to_vec(),
            ..Script::default()
        });
        let (value, is_error) = srv
            .dispatch(
                "execute_command",
                obj(json!({"command_name": "disk_usage_path", "parameters": {"path": "/tmp"}})),
            )
            .await
            .unwrap();
        assert!(!is_error);
        assert_eq!(value["command"], "du -sh /tmp");
        assert_eq!(value["output"], "4.0K\t/tmp");
    }

    #[tokio::test]
    async fn test_execute_command_injection() {
        let srv = server(Script::default());
        let (value, is_error) = srv
            .dispatch(
                "execute_command",
                obj(json!({
                    "command_name": "service_status",
                    "parameters": {"service_name": "nginx; rm -rf /"}
                })),
            )
            .await
            .unwrap();
        assert!(is_error);
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("';'"));
        assert_eq!(srv.gateway().connector().calls.opens(), 0);
    }

    #[tokio::test]
    async fn test_check_service_rejects_bad_name_before_gateway() {
        let srv = server(Script::default());
        let err = srv
            .dispatch("check_service", obj(json!({"service_name": "ngi nx"})))
            .await
            .unwrap_err();
        assert!(err.message.contains("service_name"));
        assert_eq!(srv.gateway().connector().calls.opens(), 0);
    }

    #[tokio::test]
    async fn test_check_path_size() {
        let srv = server(Script::default());
        srv.dispatch("check_path_size", obj(json!({"path": "/var/log"})))
            .await
            .unwrap();
        assert_eq!(
            srv.gateway().connector().calls.commands(),
            vec!["du -sh /var/log"]
        );
    }

    #[tokio::test]
    async fn test_list_commands_filter() {
        let srv = server(Script::default());
        let (value, is_error) = srv
            .dispatch("list_commands", obj(json!({"category": "docker"})))
            .await
            .unwrap();
        assert!(!is_error);
        let commands = value["commands"].as_array().unwrap();
        assert!(!commands.is_empty());
        assert!(commands.iter().all(|c| c["category"] == "docker"));

        let (value, is_error) = srv
            .dispatch("list_commands", obj(json!({"category": "gpu"})))
            .await
            .unwrap();
        assert!(is_error);
        assert_eq!(value["error"], "Unknown category 'gpu'");
    }

    #[tokio::test]
    async fn test_server_status() {
        let srv = server(Script::default());
        let (value, _) = srv.dispatch("server_status", JsonObject::new()).await.unwrap();
        assert_eq!(value["ssh"]["status"], "connected");
        assert_eq!(value["ssh"]["host"], "tester@mock:22");
        assert_eq!(value["categories"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_system_overview() {
        let srv = server(Script {
            stdout: b"  value \n".to_vec(),
            ..Script::default()
        });
        let (value, _) = srv
            .dispatch("system_overview", JsonObject::new())
            .await
            .unwrap();
        assert_eq!(value["success"], true);
        for name in OVERVIEW_COMMANDS {
            assert_eq!(value["system"][name], "value");
        }
        assert_eq!(srv.gateway().connector().calls.opens(), 1);
    }
}
