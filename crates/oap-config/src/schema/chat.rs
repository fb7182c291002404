use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Conversation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Characters of the first message used as a new chat's title (1-200).
    pub title_max_chars: u32,
    /// Replaces the built-in system instruction when set.
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title_max_chars: 30,
            system_prompt_path: None,
        }
    }
}
