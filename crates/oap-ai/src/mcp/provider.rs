//! [`ToolProvider`] backed by an MCP server.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::client::McpClient;
use super::protocol::Implementation;
use super::transport::{SseTransportFactory, TransportFactory};
use crate::tools::{ConnectionStatus, ToolDescriptor, ToolError, ToolOutcome, ToolProvider};

/// Settings for reaching the MCP server.
#[derive(Debug, Clone)]
pub struct McpConfig {
    /// SSE URL of the server.
    pub server_url: String,
    pub client_name: String,
    pub client_version: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl McpConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            client_name: "oap-chatbot".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(Arc<McpClient>),
    Error(String),
}

/// Owns one MCP session and its connection lifecycle.
///
/// A failed connection parks the provider in the error state. Nothing
/// reconnects from there until [`ToolProvider::connect`] is called again.
pub struct McpToolProvider {
    config: McpConfig,
    factory: Box<dyn TransportFactory>,
    state: Mutex<ConnectionState>,
    known_tools: Mutex<Option<HashSet<String>>>,
    connect_lock: tokio::sync::Mutex<()>,
}

impl McpToolProvider {
    pub fn new(config: McpConfig) -> Self {
        let factory = SseTransportFactory::new(config.server_url.clone(), config.timeout);
        Self::with_factory(config, Box::new(factory))
    }

    pub fn with_factory(config: McpConfig, factory: Box<dyn TransportFactory>) -> Self {
        Self {
            config,
            factory,
            state: Mutex::new(ConnectionState::Disconnected),
            known_tools: Mutex::new(None),
            connect_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    /// Reason for the last failed connection, if the provider is in the error state.
    pub fn last_error(&self) -> Option<String> {
        match &*self.lock_state() {
            ConnectionState::Error(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Close the session and return to disconnected.
    pub async fn disconnect(&self) {
        let previous = std::mem::replace(&mut *self.lock_state(), ConnectionState::Disconnected);
        *self.lock_known() = None;
        if let ConnectionState::Connected(client) = previous {
            client.close().await;
            info!("disconnected from MCP server");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_known(&self) -> MutexGuard<'_, Option<HashSet<String>>> {
        self.known_tools.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: ConnectionState) {
        *self.lock_state() = state;
    }

    /// The live client, demoting a session whose stream has died to disconnected.
    fn current_client(&self) -> Option<Arc<McpClient>> {
        let mut state = self.lock_state();
        match &*state {
            ConnectionState::Connected(client) if client.is_open() => Some(Arc::clone(client)),
            ConnectionState::Connected(_) => {
                warn!("MCP session lost");
                *state = ConnectionState::Disconnected;
                None
            }
            _ => None,
        }
    }

    fn note_failure(&self, client: &McpClient) {
        if !client.is_open() {
            self.set_state(ConnectionState::Disconnected);
        }
    }

    async fn open_session(&self) -> Result<McpClient, ToolError> {
        let transport = self.factory.open().await?;
        let client_info = Implementation {
            name: self.config.client_name.clone(),
            version: self.config.client_version.clone(),
        };
        match McpClient::connect(Arc::clone(&transport), client_info).await {
            Ok(client) => Ok(client),
            Err(e) => {
                transport.close().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ToolProvider for McpToolProvider {
    fn status(&self) -> ConnectionStatus {
        match &*self.lock_state() {
            ConnectionState::Disconnected => ConnectionStatus::Disconnected,
            ConnectionState::Connecting => ConnectionStatus::Connecting,
            ConnectionState::Connected(client) if client.is_open() => ConnectionStatus::Connected,
            ConnectionState::Connected(_) => ConnectionStatus::Disconnected,
            ConnectionState::Error(_) => ConnectionStatus::Error,
        }
    }

    async fn connect(&self) -> Result<(), ToolError> {
        let _guard = self.connect_lock.lock().await;
        if self.current_client().is_some() {
            return Ok(());
        }

        self.set_state(ConnectionState::Connecting);
        info!(url = %self.config.server_url, "connecting to MCP server");

        match self.open_session().await {
            Ok(client) => {
                *self.lock_known() = None;
                self.set_state(ConnectionState::Connected(Arc::new(client)));
                Ok(())
            }
            Err(e) => {
                warn!(url = %self.config.server_url, error = %e, "MCP connection failed");
                self.set_state(ConnectionState::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolError> {
        let client = match self.current_client() {
            Some(client) => client,
            None => {
                if self.status() != ConnectionStatus::Disconnected {
                    return Ok(Vec::new());
                }
                if let Err(e) = self.connect().await {
                    debug!(error = %e, "no tools available");
                    return Ok(Vec::new());
                }
                match self.current_client() {
                    Some(client) => client,
                    None => return Ok(Vec::new()),
                }
            }
        };

        let definitions = match client.list_tools().await {
            Ok(definitions) => definitions,
            Err(e) => {
                self.note_failure(&client);
                return Err(e);
            }
        };

        let mut names = HashSet::new();
        let mut descriptors = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let name = definition.name.clone();
            match definition.into_descriptor() {
                Ok(descriptor) => {
                    names.insert(name);
                    descriptors.push(descriptor);
                }
                Err(e) => warn!(tool = %name, error = %e, "skipping tool"),
            }
        }
        *self.lock_known() = Some(names);

        Ok(descriptors)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutcome, ToolError> {
        let client = self.current_client().ok_or(ToolError::NotConnected)?;

        if let Some(known) = &*self.lock_known() {
            if !known.contains(name) {
                return Err(ToolError::UnknownTool(name.to_string()));
            }
        }

        debug!(tool = name, "calling MCP tool");
        match client.call_tool(name, arguments).await {
            Ok(result) => Ok(result.into_outcome()),
            Err(e) => {
                self.note_failure(&client);
                Err(e)
            }
        }
    }
}
