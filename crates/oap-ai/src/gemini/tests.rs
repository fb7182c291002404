//! Tests for Gemini request building and response parsing.

use serde_json::json;

use super::*;
use crate::{
    AiError, GenerationRequest, Part, ParameterSchema, ToolCallRequest, ToolCallResult,
    ToolDescriptor, ToolOutcome, Turn, TurnRole,
};

fn client() -> GeminiClient {
    GeminiClient::new(GeminiConfig::new("test-key").with_model("gemini-2.5-flash")).unwrap()
}

#[test]
fn api_url_targets_model() {
    assert!(client()
        .api_url()
        .ends_with("/models/gemini-2.5-flash:generateContent"));
}

#[test]
fn debug_redacts_api_key() {
    let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[REDACTED]"));
}

#[test]
fn body_has_system_instruction_history_and_tools() {
    let request = GenerationRequest {
        system_instruction: "Follow the procedure.".into(),
        history: vec![Turn::user_text("earlier"), Turn::model_text("reply"), Turn::user_text("now")],
        tools: vec![ToolDescriptor {
            name: "start_new_application".into(),
            description: "Begin".into(),
            parameters: ParameterSchema::new(json!({
                "type": "object",
                "properties": { "oap": { "type": "string" } }
            }))
            .unwrap(),
        }],
    };

    let body = client().build_request_body(&request);
    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        "Follow the procedure."
    );
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "now");
    assert_eq!(
        body["tools"][0]["functionDeclarations"][0]["name"],
        "start_new_application"
    );
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
}

#[test]
fn body_without_tools_or_instruction_omits_them() {
    let request = GenerationRequest {
        history: vec![Turn::user_text("hello")],
        ..Default::default()
    };
    let body = client().build_request_body(&request);
    assert!(body.get("tools").is_none());
    assert!(body.get("systemInstruction").is_none());
}

#[test]
fn function_turns_serialize_call_and_response() {
    let mut call = ToolCallRequest::new("start_new_application", json!({ "oap": "X" }));
    call.thought_signature = Some("sig-1".into());
    let request = GenerationRequest {
        history: vec![
            Turn::user_text("apply to X"),
            Turn {
                role: TurnRole::Model,
                parts: vec![Part::FunctionCall(call)],
            },
            Turn::function_results(vec![ToolCallResult::new(
                "start_new_application",
                ToolOutcome::Text("{\"section\":\"BASIC_INFO\"}".into()),
            )]),
        ],
        ..Default::default()
    };

    let body = client().build_request_body(&request);
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents[1]["parts"][0]["functionCall"]["args"]["oap"], "X");
    assert_eq!(contents[1]["parts"][0]["thoughtSignature"], "sig-1");
    assert_eq!(contents[2]["role"], "function");
    let response = &contents[2]["parts"][0]["functionResponse"];
    assert_eq!(response["name"], "start_new_application");
    assert_eq!(response["response"]["content"], "{\"section\":\"BASIC_INFO\"}");
}

#[test]
fn parse_text_response() {
    let parsed = client()
        .parse_response(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "hi" }] } }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        }))
        .unwrap();
    assert_eq!(parsed.text, "hi");
    assert!(parsed.tool_calls.is_empty());
    assert_eq!(parsed.usage.input_tokens, 12);
    assert_eq!(parsed.usage.output_tokens, 3);
    assert_eq!(parsed.model_turn.role, TurnRole::Model);
}

#[test]
fn parse_function_calls_in_order() {
    let parsed = client()
        .parse_response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Starting." },
                { "functionCall": { "name": "first", "args": { "a": 1 } }, "thoughtSignature": "s" },
                { "functionCall": { "name": "second" } }
            ] } }]
        }))
        .unwrap();
    assert_eq!(parsed.text, "Starting.");
    assert_eq!(parsed.tool_calls.len(), 2);
    assert_eq!(parsed.tool_calls[0].name, "first");
    assert_eq!(parsed.tool_calls[0].thought_signature.as_deref(), Some("s"));
    assert_eq!(parsed.tool_calls[1].arguments, json!({}));
    assert_eq!(parsed.model_turn.parts.len(), 3);
}

#[test]
fn parse_skips_thought_parts() {
    let parsed = client()
        .parse_response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "thinking...", "thought": true },
                { "text": "answer" }
            ] } }]
        }))
        .unwrap();
    assert_eq!(parsed.text, "answer");
}

#[test]
fn parse_candidate_without_content_is_empty_text() {
    let parsed = client()
        .parse_response(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
        .unwrap();
    assert_eq!(parsed.text, "");
    assert!(parsed.tool_calls.is_empty());
}

#[test]
fn parse_malformed_responses() {
    let c = client();
    assert!(matches!(
        c.parse_response(json!({})),
        Err(AiError::ParseError(_))
    ));
    assert!(matches!(
        c.parse_response(json!({ "candidates": [] })),
        Err(AiError::ParseError(_))
    ));
    assert!(matches!(
        c.parse_response(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
        Err(AiError::ApiError(_))
    ));
    assert!(matches!(
        c.parse_response(json!({
            "candidates": [{ "content": { "parts": [{ "functionCall": { "args": {} } }] } }]
        })),
        Err(AiError::ParseError(_))
    ));
}

#[test]
fn from_env_requires_key() {
    let err = GeminiConfig::from_env("OAP_TEST_UNSET_GEMINI_KEY_VAR").unwrap_err();
    assert!(matches!(err, AiError::NotConfigured(_)));
}
