use serde::{Deserialize, Serialize};

/// Generation model settings.
///
/// The API key itself is never stored in the file; `api_key_env` names the
/// environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    /// Valid range: 1-65536.
    pub max_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    pub api_key_env: String,
    /// Per-request timeout in seconds (valid range: 5-600).
    pub timeout_secs: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            max_tokens: 8192,
            temperature: 0.7,
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_secs: 120,
        }
    }
}
