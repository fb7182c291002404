use serde::{Deserialize, Serialize};

/// Chat history backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub base_url: String,
    /// Per-request timeout in seconds (valid range: 1-300).
    pub timeout_secs: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".into(),
            timeout_secs: 30,
        }
    }
}
