//! Generation and tool-use engine for the OAP chat client.
//!
//! Provides:
//! - A Gemini `generateContent` client behind the [`GenerationClient`] trait
//! - An MCP (HTTP+SSE) tool provider behind the [`ToolProvider`] trait
//! - The [`Orchestrator`], which runs the generate / call-tool loop
//! - Token usage tracking

pub mod gemini;
pub mod mcp;
pub mod orchestrator;
pub mod streaming;
pub mod token_tracker;
pub mod tools;

use async_trait::async_trait;
use oap_common::{Message, Role};

pub use gemini::{GeminiClient, GeminiConfig};
pub use mcp::{McpConfig, McpToolProvider};
pub use orchestrator::{Orchestrator, RunOutcome, FALLBACK_TEXT};
pub use token_tracker::TokenTracker;
pub use tools::{
    ConnectionStatus, ParameterSchema, ToolCallResult, ToolDescriptor, ToolError, ToolOutcome,
    ToolProvider,
};

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Run one generation request to completion.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, AiError>;

    /// Model identifier, used for usage accounting.
    fn model_name(&self) -> &str;
}

/// Who produced a turn, as the generation API sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
    Function,
}

/// One unit of content inside a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    FunctionCall(ToolCallRequest),
    FunctionResponse(ToolCallResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A function-role turn answering every call of the preceding model turn.
    pub fn function_results(results: Vec<ToolCallResult>) -> Self {
        Self {
            role: TurnRole::Function,
            parts: results.into_iter().map(Part::FunctionResponse).collect(),
        }
    }

    /// Convert a committed log entry into a text turn.
    pub fn from_message(message: &Message) -> Self {
        match message.role {
            Role::User => Self::user_text(&message.text),
            Role::Model => Self::model_text(&message.text),
        }
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn function_responses(&self) -> impl Iterator<Item = &ToolCallResult> {
        self.parts.iter().filter_map(|p| match p {
            Part::FunctionResponse(r) => Some(r),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Operating instructions for the model, passed through verbatim.
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCallRequest>,
    /// The model's turn as returned, echoed back when tools are called.
    pub model_turn: Turn,
    pub usage: TokenUsage,
}

/// A function call emitted by the model.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    /// Opaque signature some models attach to calls; must be echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
            thought_signature: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl From<AiError> for oap_common::ChatError {
    fn from(err: AiError) -> Self {
        oap_common::ChatError::Generation(err.to_string())
    }
}
