//! MCP (Model Context Protocol) tool provider.
//!
//! Speaks JSON-RPC 2.0 over the HTTP+SSE transport and exposes the
//! server's tools through [`crate::ToolProvider`].

mod client;
mod protocol;
mod provider;
mod transport;


pub use client::{McpClient, MCP_PROTOCOL_VERSION};
pub use protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpContent, McpToolCallResult,
    McpToolDefinition, RequestId,
};
pub use provider::{McpConfig, McpToolProvider};
pub use transport::{McpTransport, SseTransport, SseTransportFactory, TransportFactory};
