//! Translation of tool descriptors into Gemini function declarations.

use serde_json::{Map, Value};

use super::ToolDescriptor;

/// Schema keywords the Gemini API rejects inside function parameters.
const UNSUPPORTED_SCHEMA_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "$ref",
    "$defs",
    "definitions",
    "additionalProperties",
    "default",
];

/// Convert a tool descriptor to the Gemini `functionDeclarations` entry format.
pub fn to_gemini_declaration(tool: &ToolDescriptor) -> Value {
    let mut decl = Map::new();
    decl.insert("name".into(), Value::String(tool.name.clone()));
    decl.insert(
        "description".into(),
        Value::String(tool.description.clone()),
    );
    if tool.parameters.has_properties() {
        decl.insert(
            "parameters".into(),
            sanitize_schema(tool.parameters.as_value()),
        );
    }
    Value::Object(decl)
}

fn sanitize_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !UNSUPPORTED_SCHEMA_KEYS.contains(&k.as_str()))
                .map(|(k, v)| {
                    // Property names are user data, not keywords.
                    if k == "properties" {
                        let props = v
                            .as_object()
                            .map(|p| {
                                p.iter()
                                    .map(|(name, s)| (name.clone(), sanitize_schema(s)))
                                    .collect()
                            })
                            .unwrap_or_default();
                        (k.clone(), Value::Object(props))
                    } else {
                        (k.clone(), sanitize_schema(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_schema).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ParameterSchema;
    use serde_json::json;

    fn descriptor(schema: Value) -> ToolDescriptor {
        ToolDescriptor {
            name: "start_new_application".into(),
            description: "Start an application".into(),
            parameters: ParameterSchema::new(schema).unwrap(),
        }
    }

    #[test]
    fn declaration_carries_name_and_description() {
        let decl = to_gemini_declaration(&descriptor(json!({
            "type": "object",
            "properties": { "oap": { "type": "string" } }
        })));
        assert_eq!(decl["name"], "start_new_application");
        assert_eq!(decl["description"], "Start an application");
        assert_eq!(decl["parameters"]["properties"]["oap"]["type"], "string");
    }

    #[test]
    fn unsupported_keys_removed_recursively() {
        let decl = to_gemini_declaration(&descriptor(json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "details": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "properties": { "default": { "type": "string", "default": "x" } }
                }
            }
        })));
        let params = &decl["parameters"];
        assert!(params.get("$schema").is_none());
        assert!(params.get("additionalProperties").is_none());
        let details = &params["properties"]["details"];
        assert!(details.get("additionalProperties").is_none());
        // A property literally named "default" survives; its default value does not.
        assert!(details["properties"].get("default").is_some());
        assert!(details["properties"]["default"].get("default").is_none());
    }

    #[test]
    fn parameterless_tool_omits_parameters() {
        let decl = to_gemini_declaration(&descriptor(Value::Null));
        assert!(decl.get("parameters").is_none());
    }
}
