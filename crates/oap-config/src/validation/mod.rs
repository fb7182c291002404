//! Configuration validation.
//!
//! Validates numeric ranges and URL shapes, collecting every problem into
//! a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::OapConfig;
use helpers::{validate_range, validate_range_f64, validate_url};
use oap_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &OapConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    let generation = &config.generation;
    if generation.model.trim().is_empty() {
        errors.push("generation.model must not be empty".into());
    }
    validate_range(&mut errors, "generation.max_tokens", generation.max_tokens, 1, 65536);
    validate_range_f64(&mut errors, "generation.temperature", generation.temperature, 0.0, 2.0);
    validate_range(&mut errors, "generation.timeout_secs", generation.timeout_secs, 5, 600);

    validate_url(&mut errors, "tools.server_url", &config.tools.server_url);
    validate_range(&mut errors, "tools.max_tool_rounds", config.tools.max_tool_rounds, 1, 50);
    validate_range(&mut errors, "tools.timeout_secs", config.tools.timeout_secs, 1, 600);

    validate_url(&mut errors, "persistence.base_url", &config.persistence.base_url);
    validate_range(
        &mut errors,
        "persistence.timeout_secs",
        config.persistence.timeout_secs,
        1,
        300,
    );

    validate_range(&mut errors, "chat.title_max_chars", config.chat.title_max_chars, 1, 200);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
