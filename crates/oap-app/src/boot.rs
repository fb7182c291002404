//! Service construction from config.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use oap_ai::{AiError, GeminiClient, GeminiConfig, McpConfig, McpToolProvider, Orchestrator};
use oap_common::ChatError;
use oap_config::schema::ChatConfig;
use oap_config::OapConfig;
use oap_session::ConversationSession;
use oap_store::HttpChatStore;
use tracing::{info, warn};

/// Built-in operating procedure for the assistant.
const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/oap_assistant.md");

pub struct Services {
    pub session: ConversationSession,
    pub tools: Arc<McpToolProvider>,
}

pub fn build(config: &OapConfig) -> Result<Services, ChatError> {
    let generation = &config.generation;
    let api_key = oap_config::env::api_key(config).ok_or_else(|| {
        AiError::NotConfigured(format!("{} is not set", generation.api_key_env))
    })?;
    let gemini = GeminiClient::new(
        GeminiConfig::new(api_key)
            .with_model(&generation.model)
            .with_max_tokens(generation.max_tokens)
            .with_temperature(generation.temperature)
            .with_timeout(secs(generation.timeout_secs)),
    )?;

    let mut mcp = McpConfig::new(&config.tools.server_url)
        .with_client_name(&config.tools.client_name)
        .with_timeout(secs(config.tools.timeout_secs));
    if let Some(version) = &config.tools.client_version {
        mcp = mcp.with_client_version(version);
    }
    let tools = Arc::new(McpToolProvider::new(mcp));

    let orchestrator = Orchestrator::new(
        Arc::new(gemini),
        tools.clone(),
        system_prompt(&config.chat),
    )
    .with_max_tool_rounds(config.tools.max_tool_rounds);

    let store = HttpChatStore::new(
        &config.persistence.base_url,
        secs(config.persistence.timeout_secs),
    )?;
    let backend = store.base_url().to_string();

    let session = ConversationSession::new(Arc::new(store), Arc::new(orchestrator))
        .with_title_max_chars(config.chat.title_max_chars as usize);

    info!(
        model = %generation.model,
        backend = %backend,
        tools = %config.tools.server_url,
        "services ready"
    );
    Ok(Services { session, tools })
}

/// The configured prompt file, or the built-in prompt if unset or unreadable.
pub fn system_prompt(config: &ChatConfig) -> String {
    match config.system_prompt_path.as_deref() {
        Some(path) => read_prompt(path).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        None => DEFAULT_SYSTEM_PROMPT.to_string(),
    }
}

fn read_prompt(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            warn!(path = %path.display(), "system prompt file is empty, using built-in prompt");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read system prompt, using built-in prompt");
            None
        }
    }
}

fn secs(value: u32) -> Duration {
    Duration::from_secs(u64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_prompt_names_the_entry_tool() {
        let prompt = system_prompt(&ChatConfig::default());
        assert!(prompt.contains("start_new_application"));
    }

    #[test]
    fn missing_prompt_file_falls_back() {
        let config = ChatConfig {
            system_prompt_path: Some(PathBuf::from("/tmp/oap_chat_no_such_prompt.md")),
            ..Default::default()
        };
        assert_eq!(system_prompt(&config), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn prompt_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.md");
        std::fs::write(&path, "Be brief.").unwrap();

        let config = ChatConfig {
            system_prompt_path: Some(path),
            ..Default::default()
        };
        assert_eq!(system_prompt(&config), "Be brief.");
    }
}
