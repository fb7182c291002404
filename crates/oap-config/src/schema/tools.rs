use oap_common::ToolMode;
use serde::{Deserialize, Serialize};

/// MCP tool provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// SSE endpoint of the MCP server.
    pub server_url: String,
    /// Tool mode a fresh session starts in.
    pub default_mode: ToolMode,
    /// Generation rounds that may request tools before the loop gives up (1-50).
    pub max_tool_rounds: u32,
    pub client_name: String,
    /// Version reported in the MCP handshake; the client build version when unset.
    pub client_version: Option<String>,
    /// Per-request timeout in seconds (valid range: 1-600).
    pub timeout_secs: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000/sse".into(),
            default_mode: ToolMode::Disabled,
            max_tool_rounds: 10,
            client_name: "oap-chatbot".into(),
            client_version: None,
            timeout_secs: 60,
        }
    }
}
