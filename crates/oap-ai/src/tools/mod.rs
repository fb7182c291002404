//! Tool provider capability and the typed payloads that cross it.
//!
//! Tools are discovered from an external provider (an MCP server) and
//! advertised to the model as function declarations.

mod declarations;
mod types;

pub use declarations::to_gemini_declaration;
pub use types::{ParameterSchema, ToolCallResult, ToolDescriptor, ToolOutcome};

use async_trait::async_trait;

/// Connection lifecycle of a tool provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[async_trait]
pub trait ToolProvider: Send + Sync {
    fn status(&self) -> ConnectionStatus;

    /// Establish the session. A no-op when already connected.
    async fn connect(&self) -> Result<(), ToolError>;

    /// Discover the available tools.
    ///
    /// When disconnected this makes one connection attempt and yields an
    /// empty list if it fails.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolError>;

    /// Invoke a tool. Fails with [`ToolError::NotConnected`] unless connected.
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutcome, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Not connected to MCP server")]
    NotConnected,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Server error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Invalid parameter schema: {0}")]
    InvalidSchema(String),
    #[error("Request timed out")]
    Timeout,
}

impl From<ToolError> for oap_common::ChatError {
    fn from(err: ToolError) -> Self {
        oap_common::ChatError::Tool(err.to_string())
    }
}
