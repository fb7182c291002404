//! Chat list management and the selection / reload path.

use chrono::Utc;
use oap_ai::ConnectionStatus;
use oap_common::{ChatError, ChatId, ChatSession, ToolMode};
use oap_store::{ChatRecord, UNTITLED_CHAT};
use tracing::{debug, info, warn};

use super::ConversationSession;

/// What [`ConversationSession::select_chat`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The chat is already active with a send in flight; the local log was kept.
    Skipped,
    /// The log was replaced with the backend's copy.
    Reloaded { messages: usize },
    /// Another chat became active while loading; nothing was applied.
    Superseded,
}

impl ConversationSession {
    /// Refresh the chat list from the backend.
    pub async fn load_chats(&self) -> Result<usize, ChatError> {
        let chats = self.store.list_chats().await?;
        let count = chats.len();
        self.lock().chats = chats;
        debug!(count, "chat list loaded");
        Ok(count)
    }

    /// Make `id` the active chat and load its messages.
    ///
    /// Re-selecting the active chat while a send is in flight is skipped so
    /// the in-memory log is not overwritten by a backend copy that lags it.
    pub async fn select_chat(&self, id: &ChatId) -> Result<Selection, ChatError> {
        let epoch = {
            let mut state = self.lock();
            if state.chat.id.as_ref() == Some(id)
                && (self.guard.consume_if_matches(id) || self.is_busy())
            {
                debug!(chat = %id, "skipping reload of chat with a send in flight");
                return Ok(Selection::Skipped);
            }
            self.guard.release();

            let placeholder = state
                .chats
                .iter()
                .find(|c| &c.id == id)
                .map(ChatRecord::to_session)
                .unwrap_or_else(|| ChatSession::persisted(id.clone(), UNTITLED_CHAT, Utc::now()));
            state.reset_to(placeholder, Vec::new());
            state.epoch
        };

        let detail = self.store.get_chat(id).await?;

        let mut state = self.lock();
        if state.epoch != epoch {
            debug!(chat = %id, "selection superseded");
            return Ok(Selection::Superseded);
        }
        let session = detail.chat.to_session();
        let messages = detail.into_messages();
        let count = messages.len();
        state.chat = session;
        state.messages = messages;
        info!(chat = %id, messages = count, "chat loaded");
        Ok(Selection::Reloaded { messages: count })
    }

    /// Start a fresh, not yet persisted chat.
    pub fn new_chat(&self) {
        let mut state = self.lock();
        state.reset_to(ChatSession::unsaved(), Vec::new());
        self.guard.release();
        debug!("new chat started");
    }

    pub async fn delete_chat(&self, id: &ChatId) -> Result<(), ChatError> {
        self.store.delete_chat(id).await?;
        self.guard.consume_if_matches(id);

        let mut state = self.lock();
        state.chats.retain(|c| &c.id != id);
        if state.chat.id.as_ref() == Some(id) {
            state.reset_to(ChatSession::unsaved(), Vec::new());
        }
        info!(chat = %id, "chat deleted");
        Ok(())
    }

    pub async fn rename_chat(&self, id: &ChatId, title: &str) -> Result<ChatRecord, ChatError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let record = self.store.update_chat_title(id, title).await?;

        let mut state = self.lock();
        if let Some(entry) = state.chats.iter_mut().find(|c| &c.id == id) {
            *entry = record.clone();
        }
        if state.chat.id.as_ref() == Some(id) {
            state.chat.title = record.display_title().to_string();
        }
        Ok(record)
    }

    /// Switch tool mode. Enabling it retries a disconnected or failed provider once.
    pub async fn set_tool_mode(&self, mode: ToolMode) -> ConnectionStatus {
        self.lock().tool_mode = mode;

        let provider = self.orchestrator.tool_provider();
        if mode.is_enabled()
            && matches!(
                provider.status(),
                ConnectionStatus::Disconnected | ConnectionStatus::Error
            )
        {
            if let Err(e) = provider.connect().await {
                warn!(error = %e, "tool provider unavailable");
            }
        }
        provider.status()
    }
}
