//! The send path: one user message in, one assistant message out.

use oap_ai::FALLBACK_TEXT;
use oap_common::{ChatError, ChatId, Message, Role};
use tracing::{debug, error, info, warn};

use super::ConversationSession;
use crate::busy::BusyGuard;

/// Shown and stored in place of an empty model answer.
pub const NO_RESPONSE_TEXT: &str = "No response text";

/// Outcome of [`ConversationSession::send_user_message`].
#[derive(Debug)]
pub struct Reply {
    /// The assistant message appended to the log.
    pub message: Message,
    /// Why `message` is the fallback error reply, if it is.
    pub failure: Option<ChatError>,
    /// Chat the exchange was written to, when one exists.
    pub chat_id: Option<ChatId>,
    /// Whether `message` reached the backend.
    pub persisted: bool,
}

impl Reply {
    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }
}

impl ConversationSession {
    /// Send `text` as the user and wait for the assistant's answer.
    ///
    /// Only input rejection is returned as `Err`: empty text or a send
    /// already in flight. Every later failure is reported in the [`Reply`]
    /// as a fallback assistant message that is shown but not persisted.
    pub async fn send_user_message(&self, text: &str) -> Result<Reply, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let _busy = BusyGuard::acquire(&self.busy)?;
        let _release = self.guard.release_on_drop();
        Ok(self.exchange(text).await)
    }

    async fn exchange(&self, text: &str) -> Reply {
        let user_message = Message::user(text);
        let (history, chat_id, mode, epoch) = {
            let mut state = self.lock();
            let history = state.messages.clone();
            state.messages.push(user_message.clone());
            (history, state.chat.id.clone(), state.tool_mode, state.epoch)
        };

        let chat_id = match chat_id {
            Some(id) => id,
            None => match self.create_chat_for(text, epoch).await {
                Ok(id) => id,
                Err(e) => return self.fail(None, epoch, e),
            },
        };

        match self.store.add_message(&chat_id, Role::User, text).await {
            Ok(record) => self.replace_provisional(epoch, &user_message.id, &record.id),
            Err(e) => return self.fail(Some(chat_id), epoch, e.into()),
        }

        let outcome = self.orchestrator.run(&history, text, mode).await;
        if let Some(e) = outcome.error {
            return self.fail(Some(chat_id), epoch, e.into());
        }
        if outcome.capped {
            info!(chat = %chat_id, rounds = outcome.tool_rounds, "reply cut off at tool round limit");
        }

        let reply_text = if outcome.text.trim().is_empty() {
            NO_RESPONSE_TEXT.to_string()
        } else {
            outcome.text
        };
        let assistant = Message::model(reply_text);
        self.append_if_current(epoch, assistant.clone());

        match self
            .store
            .add_message(&chat_id, Role::Model, &assistant.text)
            .await
        {
            Ok(record) => {
                self.replace_provisional(epoch, &assistant.id, &record.id);
                Reply {
                    message: assistant.with_id(record.id),
                    failure: None,
                    chat_id: Some(chat_id),
                    persisted: true,
                }
            }
            Err(e) => {
                warn!(chat = %chat_id, error = %e, "failed to persist assistant message");
                Reply {
                    message: assistant,
                    failure: None,
                    chat_id: Some(chat_id),
                    persisted: false,
                }
            }
        }
    }

    /// Create the backend chat for a first message and adopt it as current.
    async fn create_chat_for(&self, text: &str, epoch: u64) -> Result<ChatId, ChatError> {
        let title = chat_title(text, self.title_max_chars);
        let record = self.store.create_chat(Some(&title)).await?;
        info!(chat = %record.id, title = %title, "chat created");

        let mut state = self.lock();
        if state.epoch == epoch && state.chat.assign_id(record.id.clone(), record.display_title()) {
            state.chat.created_at = record.created_at;
            self.guard.arm(record.id.clone());
        } else {
            debug!(chat = %record.id, "active chat changed during creation");
        }
        state.chats.retain(|c| c.id != record.id);
        state.chats.insert(0, record.clone());

        Ok(record.id)
    }

    fn fail(&self, chat_id: Option<ChatId>, epoch: u64, failure: ChatError) -> Reply {
        error!(error = %failure, "message exchange failed");
        let message = Message::model(FALLBACK_TEXT);
        self.append_if_current(epoch, message.clone());
        Reply {
            message,
            failure: Some(failure),
            chat_id,
            persisted: false,
        }
    }

    fn append_if_current(&self, epoch: u64, message: Message) {
        let mut state = self.lock();
        if state.epoch == epoch {
            state.messages.push(message);
        } else {
            debug!(id = %message.id, "active chat changed, not appending");
        }
    }

    fn replace_provisional(&self, epoch: u64, provisional: &str, persisted: &str) {
        let mut state = self.lock();
        if state.epoch != epoch {
            return;
        }
        if let Some(slot) = state.messages.iter_mut().find(|m| m.id == provisional) {
            *slot = slot.with_id(persisted);
        }
    }
}

/// Title for a new chat: the first `max_chars` characters, marked when cut.
pub(crate) fn chat_title(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head.trim_end())
    } else {
        text.to_string()
    }
}
