//! Conversation session.
//!
//! A `ConversationSession` owns the in-memory message log of the active
//! chat, that chat's identity, the chat list, and the tool mode. It is the
//! only writer of the log.

mod manage;
mod send;


use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use oap_ai::{ConnectionStatus, Orchestrator, TokenTracker};
use oap_common::{ChatError, ChatSession, Message, ToolMode};
use oap_store::{ChatRecord, PersistenceGateway};

use crate::guard::SessionGuard;

pub use manage::Selection;
pub use send::{Reply, NO_RESPONSE_TEXT};

/// Default number of characters of the first message used as a chat title.
const DEFAULT_TITLE_CHARS: usize = 30;

pub(crate) struct SessionState {
    pub(crate) chat: ChatSession,
    pub(crate) messages: Vec<Message>,
    pub(crate) chats: Vec<ChatRecord>,
    pub(crate) tool_mode: ToolMode,
    /// Bumped whenever the active chat changes; in-flight work compares it
    /// after every await before touching the log.
    pub(crate) epoch: u64,
}

impl SessionState {
    fn reset_to(&mut self, chat: ChatSession, messages: Vec<Message>) {
        self.chat = chat;
        self.messages = messages;
        self.epoch += 1;
    }
}

pub struct ConversationSession {
    store: Arc<dyn PersistenceGateway>,
    orchestrator: Arc<Orchestrator>,
    guard: SessionGuard,
    busy: AtomicBool,
    title_max_chars: usize,
    state: Mutex<SessionState>,
}

impl ConversationSession {
    pub fn new(store: Arc<dyn PersistenceGateway>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            store,
            orchestrator,
            guard: SessionGuard::new(),
            busy: AtomicBool::new(false),
            title_max_chars: DEFAULT_TITLE_CHARS,
            state: Mutex::new(SessionState {
                chat: ChatSession::unsaved(),
                messages: Vec::new(),
                chats: Vec::new(),
                tool_mode: ToolMode::default(),
                epoch: 0,
            }),
        }
    }

    pub fn with_title_max_chars(mut self, chars: usize) -> Self {
        self.title_max_chars = chars.max(1);
        self
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn chats(&self) -> Vec<ChatRecord> {
        self.lock().chats.clone()
    }

    pub fn current_chat(&self) -> ChatSession {
        self.lock().chat.clone()
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.lock().tool_mode
    }

    pub fn tool_status(&self) -> ConnectionStatus {
        self.orchestrator.tool_provider().status()
    }

    /// Token usage across every run in this session.
    pub fn usage(&self) -> TokenTracker {
        self.orchestrator.usage()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(std::sync::atomic::Ordering::Acquire)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
