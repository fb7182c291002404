//! Environment variable overrides applied on top of the TOML file.

use tracing::debug;

use crate::schema::OapConfig;

pub const BACKEND_URL_VAR: &str = "OAP_BACKEND_URL";
pub const MCP_SERVER_URL_VAR: &str = "OAP_MCP_SERVER_URL";
pub const MODEL_VAR: &str = "OAP_MODEL";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut OapConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` to resolve variables. Empty values are ignored.
pub fn apply_overrides_from(config: &mut OapConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(BACKEND_URL_VAR) {
        debug!(var = BACKEND_URL_VAR, "persistence URL overridden from environment");
        config.persistence.base_url = url;
    }
    if let Some(url) = get(MCP_SERVER_URL_VAR) {
        debug!(var = MCP_SERVER_URL_VAR, "tool server URL overridden from environment");
        config.tools.server_url = url;
    }
    if let Some(model) = get(MODEL_VAR) {
        debug!(var = MODEL_VAR, "model overridden from environment");
        config.generation.model = model;
    }
}

/// Read the generation API key from the variable named in the config.
pub fn api_key(config: &OapConfig) -> Option<String> {
    std::env::var(&config.generation.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (BACKEND_URL_VAR, "http://backend:4000"),
            (MCP_SERVER_URL_VAR, "http://mcp:3000/sse"),
            (MODEL_VAR, "gemini-2.0-flash"),
        ]);
        let mut config = OapConfig::default();
        apply_overrides_from(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.persistence.base_url, "http://backend:4000");
        assert_eq!(config.tools.server_url, "http://mcp:3000/sse");
        assert_eq!(config.generation.model, "gemini-2.0-flash");
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut config = OapConfig::default();
        apply_overrides_from(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.persistence.base_url, "http://localhost:4000");
        assert_eq!(config.generation.model, "gemini-2.5-flash");
    }
}
