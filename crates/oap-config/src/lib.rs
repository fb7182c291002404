//! OAP chat configuration system.
//!
//! Provides TOML-based configuration with environment overrides and
//! validation. All config sections use sensible defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use oap_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{OapConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use oap_common::ConfigError;

/// Load config from the platform default path, then apply environment overrides.
///
/// Creates a default `config.toml` if none exists.
pub fn load_config() -> Result<OapConfig, ConfigError> {
    let mut config = toml_loader::load_default()?;
    env::apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit file, then apply environment overrides.
pub fn load_config_from(path: &Path) -> Result<OapConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let mut config = toml_loader::load_from_path(path)?;
    env::apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &OapConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = OapConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"generation\""));
        assert!(json.contains("\"tools\""));
        assert!(json.contains("\"persistence\""));
        assert!(json.contains("\"chat\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_missing_file_is_not_found() {
        let err = load_config_from(Path::new("/tmp/oap_chat_missing_config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = OapConfig::default();
        let json = config_to_json(&config);
        let parsed: OapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.generation.model, "gemini-2.5-flash");
        assert_eq!(parsed.tools.max_tool_rounds, 10);
        assert_eq!(parsed.persistence.base_url, "http://localhost:4000");
    }
}
