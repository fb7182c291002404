//! MCP JSON-RPC protocol types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::{ParameterSchema, ToolDescriptor, ToolError, ToolOutcome};

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request. Notifications carry no id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(RequestId::Number(id)),
        }
    }

    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }
}

/// JSON-RPC request ID.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

/// JSON-RPC response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

impl JsonRpcResponse {
    /// The result value, or the server's error.
    pub fn into_result(self) -> Result<Value, ToolError> {
        if let Some(error) = self.error {
            return Err(ToolError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| ToolError::Protocol("response has neither result nor error".into()))
    }
}

/// JSON-RPC error object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// MCP tool definition from server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct McpToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpToolDefinition {
    /// Validate into a descriptor the generation layer can advertise.
    pub fn into_descriptor(self) -> Result<ToolDescriptor, ToolError> {
        Ok(ToolDescriptor {
            parameters: ParameterSchema::new(self.input_schema)?,
            description: self.description.unwrap_or_default(),
            name: self.name,
        })
    }
}

/// MCP tool call result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct McpToolCallResult {
    #[serde(default)]
    pub content: Vec<McpContent>,
    #[serde(default, rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl McpToolCallResult {
    /// Collapse the content items into a typed outcome.
    ///
    /// Text items are joined with newlines. A result without text falls back
    /// to its structured content, then to the whole result as JSON.
    pub fn into_outcome(self) -> ToolOutcome {
        let texts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|item| match item {
                McpContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if self.is_error {
            let message = if texts.is_empty() {
                "tool reported an error".to_string()
            } else {
                texts.join("\n")
            };
            return ToolOutcome::Error(message);
        }

        if !texts.is_empty() {
            return ToolOutcome::Text(texts.join("\n"));
        }

        if let Some(ref value) = self.structured_content {
            return ToolOutcome::Json(value.clone());
        }
        ToolOutcome::Json(serde_json::to_value(&self).unwrap_or(Value::Null))
    }
}

/// MCP content item.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum McpContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image")]
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    #[serde(rename = "resource")]
    Resource { resource: Value },
    #[serde(other)]
    Unsupported,
}

/// Initialize request params.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: Value,
    #[serde(rename = "clientInfo")]
    pub client_info: Implementation,
}

/// Name and version of a protocol participant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Initialize response result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(rename = "serverInfo")]
    pub server_info: Option<Implementation>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ToolsListResult {
    #[serde(default)]
    pub tools: Vec<McpToolDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ToolCallParams {
    pub name: String,
    pub arguments: Value,
}
