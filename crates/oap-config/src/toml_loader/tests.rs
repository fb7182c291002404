//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_oap_chat_config.toml"));
    assert!(matches!(
        result.unwrap_err(),
        oap_common::ConfigError::ParseError(_)
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[generation]
model = "gemini-2.0-flash"

[tools]
server_url = "http://tools.internal:3000/sse"
default_mode = "enabled"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.generation.model, "gemini-2.0-flash");
    assert_eq!(config.tools.server_url, "http://tools.internal:3000/sse");
    assert_eq!(config.tools.default_mode, oap_common::ToolMode::Enabled);
    // Defaults preserved
    assert_eq!(config.generation.api_key_env, "GEMINI_API_KEY");
    assert_eq!(config.tools.max_tool_rounds, 10);
    assert_eq!(config.persistence.base_url, "http://localhost:4000");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result.unwrap_err(),
        oap_common::ConfigError::ParseError(_)
    ));
}

#[test]
fn out_of_range_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[tools]\nmax_tool_rounds = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.tools.max_tool_rounds, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oap-chat").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.generation.model, "gemini-2.5-flash");
    assert_eq!(config.chat.title_max_chars, 30);
    assert!(config.chat.system_prompt_path.is_none());
    assert!(config.tools.client_version.is_none());

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains(&format!(
        "# Schema version {}",
        crate::CONFIG_SCHEMA_VERSION
    )));
}

#[test]
fn client_version_override_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[tools]\nclient_version = \"2.1.0\"\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.tools.client_version.as_deref(), Some("2.1.0"));
    assert_eq!(config.tools.client_name, "oap-chatbot");
}

#[test]
fn default_config_path_ends_with_app_dir() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("oap-chat/config.toml"));
    }
}
