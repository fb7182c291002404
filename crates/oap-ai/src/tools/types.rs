//! Tool descriptors, argument schemas, and call outcomes.

use serde_json::{json, Map, Value};

use super::ToolError;

/// JSON-Schema object describing a tool's arguments.
///
/// Always an object schema; validated when a descriptor is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSchema(Value);

impl ParameterSchema {
    /// Validate a raw schema. `null` is accepted as "no parameters".
    pub fn new(raw: Value) -> Result<Self, ToolError> {
        match raw {
            Value::Null => Ok(Self::empty()),
            Value::Object(ref map) => {
                match map.get("type") {
                    None => {}
                    Some(Value::String(t)) if t == "object" => {}
                    Some(other) => {
                        return Err(ToolError::InvalidSchema(format!(
                            "expected type \"object\", got {other}"
                        )))
                    }
                }
                if let Some(props) = map.get("properties") {
                    if !props.is_object() {
                        return Err(ToolError::InvalidSchema(
                            "\"properties\" must be an object".into(),
                        ));
                    }
                }
                Ok(Self(raw))
            }
            other => Err(ToolError::InvalidSchema(format!(
                "schema must be an object, got {other}"
            ))),
        }
    }

    pub fn empty() -> Self {
        Self(json!({ "type": "object", "properties": {} }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    pub fn has_properties(&self) -> bool {
        self.properties().is_some_and(|p| !p.is_empty())
    }
}

/// A tool as advertised by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

/// What a tool invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Text(String),
    Json(Value),
    Error(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error(_))
    }

    /// Payload placed in the function response's `content` field.
    pub fn content_value(&self) -> Value {
        match self {
            ToolOutcome::Text(text) | ToolOutcome::Error(text) => Value::String(text.clone()),
            ToolOutcome::Json(value) => value.clone(),
        }
    }
}

/// Closure for one tool call; produced even when the call fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub name: String,
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    pub fn new(name: impl Into<String>, outcome: ToolOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
        }
    }

    /// Result for a call that could not be completed.
    pub fn failed(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::new(
            name,
            ToolOutcome::Error(format!("Error executing tool: {reason}")),
        )
    }
}
