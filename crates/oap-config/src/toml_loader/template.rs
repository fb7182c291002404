//! Default TOML config template with inline documentation comments.

use crate::schema::CONFIG_SCHEMA_VERSION;

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    let body = r##"# Only override what you want to change -- missing fields use defaults.

[generation]
# model = "gemini-2.5-flash"      # overridden by OAP_MODEL
# max_tokens = 8192               # 1-65536
# temperature = 0.7               # 0.0-2.0
# api_key_env = "GEMINI_API_KEY"  # environment variable holding the API key
# timeout_secs = 120              # 5-600

[tools]
# server_url = "http://localhost:3000/sse"  # overridden by OAP_MCP_SERVER_URL
# default_mode = "disabled"       # enabled, disabled
# max_tool_rounds = 10            # 1-50
# client_name = "oap-chatbot"
# client_version = "1.0.0"        # defaults to the client build version
# timeout_secs = 60               # 1-600

[persistence]
# base_url = "http://localhost:4000"  # overridden by OAP_BACKEND_URL
# timeout_secs = 30               # 1-300

[chat]
# title_max_chars = 30            # 1-200
# system_prompt_path = "/path/to/prompt.md"

[logging]
# level = "info"                  # trace, debug, info, warn, error
"##;
    format!("# OAP Chat Configuration\n# Schema version {CONFIG_SCHEMA_VERSION}\n{body}")
}
