use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&OapConfig::default()).is_ok());
}

#[test]
fn zero_tool_rounds_rejected() {
    let mut config = OapConfig::default();
    config.tools.max_tool_rounds = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tools.max_tool_rounds"), "got: {err}");
}

#[test]
fn bad_urls_rejected() {
    let mut config = OapConfig::default();
    config.tools.server_url = "localhost:3000/sse".into();
    config.persistence.base_url = "https://".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tools.server_url"));
    assert!(err.contains("persistence.base_url"));
}

#[test]
fn url_with_space_in_host_rejected() {
    let mut config = OapConfig::default();
    config.tools.server_url = "http:// x".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tools.server_url"), "got: {err}");

    config.tools.server_url = "http://127.0.0.1:3000/sse".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn all_errors_are_collected() {
    let mut config = OapConfig::default();
    config.generation.model = "  ".into();
    config.generation.temperature = 3.5;
    config.chat.title_max_chars = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.model"));
    assert!(err.contains("generation.temperature"));
    assert!(err.contains("chat.title_max_chars"));
    assert_eq!(err.matches("; ").count(), 2);
}
