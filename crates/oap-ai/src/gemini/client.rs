//! Gemini API client struct, request building, and response parsing.

use serde_json::{json, Value};

use crate::tools::to_gemini_declaration;
use crate::{
    AiError, GenerationRequest, GenerationResponse, Part, TokenUsage, ToolCallRequest, Turn,
    TurnRole,
};

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, request: &GenerationRequest) -> Value {
        let contents: Vec<Value> = request
            .history
            .iter()
            .filter(|turn| !turn.parts.is_empty())
            .map(turn_to_json)
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if !request.system_instruction.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": request.system_instruction }]
            });
        }

        if !request.tools.is_empty() {
            let declarations: Vec<_> = request.tools.iter().map(to_gemini_declaration).collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    /// Parse a Gemini response.
    pub(crate) fn parse_response(&self, json: Value) -> Result<GenerationResponse, AiError> {
        let candidates = match json["candidates"].as_array() {
            Some(c) => c,
            None => {
                if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
                    return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
                }
                return Err(AiError::ParseError("no candidates in response".to_string()));
            }
        };

        let first = candidates
            .first()
            .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

        let raw_parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        let mut parts = Vec::new();

        for part in &raw_parts {
            if part["thought"].as_bool() == Some(true) {
                continue;
            }
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
                parts.push(Part::Text(t.to_string()));
            }
            if let Some(fc) = part.get("functionCall") {
                let name = fc["name"]
                    .as_str()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| AiError::ParseError("functionCall without name".into()))?;
                let arguments = match fc.get("args") {
                    Some(args) if !args.is_null() => args.clone(),
                    _ => json!({}),
                };
                let mut call = ToolCallRequest::new(name, arguments);
                call.thought_signature = part["thoughtSignature"].as_str().map(str::to_string);
                parts.push(Part::FunctionCall(call.clone()));
                tool_calls.push(call);
            }
        }

        let usage = TokenUsage {
            input_tokens: json["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0),
            output_tokens: json["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0),
        };

        Ok(GenerationResponse {
            text,
            tool_calls,
            model_turn: Turn {
                role: TurnRole::Model,
                parts,
            },
            usage,
        })
    }
}

fn turn_to_json(turn: &Turn) -> Value {
    let role = match turn.role {
        TurnRole::User => "user",
        TurnRole::Model => "model",
        TurnRole::Function => "function",
    };
    let parts: Vec<Value> = turn.parts.iter().map(part_to_json).collect();
    json!({ "role": role, "parts": parts })
}

fn part_to_json(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::FunctionCall(call) => {
            let mut value = json!({
                "functionCall": { "name": call.name, "args": call.arguments }
            });
            if let Some(ref signature) = call.thought_signature {
                value["thoughtSignature"] = Value::String(signature.clone());
            }
            value
        }
        Part::FunctionResponse(result) => json!({
            "functionResponse": {
                "name": result.name,
                "response": {
                    "name": result.name,
                    "content": result.outcome.content_value(),
                }
            }
        }),
    }
}
