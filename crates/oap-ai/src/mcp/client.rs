//! MCP client session on top of a transport.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use super::protocol::{
    Implementation, InitializeParams, InitializeResult, McpToolCallResult, McpToolDefinition,
    ToolCallParams, ToolsListResult,
};
use super::transport::McpTransport;
use crate::tools::ToolError;

/// Protocol revision sent in the `initialize` handshake.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// An initialized MCP session.
pub struct McpClient {
    transport: Arc<dyn McpTransport>,
}

impl McpClient {
    /// Run the `initialize` handshake over `transport`.
    pub async fn connect(
        transport: Arc<dyn McpTransport>,
        client_info: Implementation,
    ) -> Result<Self, ToolError> {
        let params = InitializeParams {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info,
        };
        let params = serde_json::to_value(params)
            .map_err(|e| ToolError::Protocol(e.to_string()))?;

        let result = transport.request("initialize", Some(params)).await?;
        let server_info: InitializeResult = serde_json::from_value(result)
            .map_err(|e| ToolError::Protocol(format!("bad initialize result: {e}")))?;

        if server_info.protocol_version != MCP_PROTOCOL_VERSION {
            debug!(
                server = %server_info.protocol_version,
                client = MCP_PROTOCOL_VERSION,
                "MCP protocol version differs"
            );
        }

        transport.notify("notifications/initialized", None).await?;

        if let Some(info) = &server_info.server_info {
            info!(name = %info.name, version = %info.version, "MCP session initialized");
        }

        Ok(Self { transport })
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Fetch every tool definition, following pagination cursors.
    pub async fn list_tools(&self) -> Result<Vec<McpToolDefinition>, ToolError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let params = cursor.as_ref().map(|c| json!({ "cursor": c }));
            let result = self.transport.request("tools/list", params).await?;
            let page: ToolsListResult = serde_json::from_value(result)
                .map_err(|e| ToolError::Protocol(format!("bad tools/list result: {e}")))?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) if !next.is_empty() => {
                    if !seen.insert(next.clone()) {
                        return Err(ToolError::Protocol(format!(
                            "tools/list repeated cursor {next}"
                        )));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(count = tools.len(), "MCP tools listed");
        Ok(tools)
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<McpToolCallResult, ToolError> {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };
        let params = serde_json::to_value(ToolCallParams {
            name: name.to_string(),
            arguments,
        })
        .map_err(|e| ToolError::Protocol(e.to_string()))?;

        let result = self.transport.request("tools/call", Some(params)).await?;
        serde_json::from_value(result)
            .map_err(|e| ToolError::Protocol(format!("bad tools/call result: {e}")))
    }

    pub async fn close(&self) {
        self.transport.close().await;
    }
}
