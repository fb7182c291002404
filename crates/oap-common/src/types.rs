//! Conversation data model shared by every crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{provisional_id, ChatId};

/// Author of a persisted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "model" | "assistant" => Ok(Role::Model),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// One entry of the conversation log.
///
/// Messages are never edited in place. When the backend acknowledges a
/// provisional message, the log entry is replaced by [`Message::with_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// A provisional message stamped with the current time.
    pub fn provisional(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: provisional_id(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::provisional(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::provisional(Role::Model, text)
    }

    /// The same message under the id the backend assigned to it.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    pub fn is_provisional(&self) -> bool {
        crate::id::is_provisional(&self.id)
    }
}

/// Identity of the active conversation.
///
/// `id` is `None` until the first message is sent; it is assigned at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Option<ChatId>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn unsaved() -> Self {
        Self {
            id: None,
            title: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn persisted(id: ChatId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            created_at,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Record the backend id for a chat created from this session.
    ///
    /// Returns `false` and leaves the session untouched if an id was already set.
    pub fn assign_id(&mut self, id: ChatId, title: impl Into<String>) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        self.title = title.into();
        true
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::unsaved()
    }
}

/// Whether generation requests advertise the tool provider's tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    Enabled,
    #[default]
    Disabled,
}

impl ToolMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ToolMode::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_backend_strings() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("model".parse::<Role>().unwrap(), Role::Model);
        assert!("function".parse::<Role>().is_err());
        assert_eq!(Role::Model.as_str(), "model");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn provisional_message_gets_replaced_id() {
        let msg = Message::user("hello");
        assert!(msg.is_provisional());

        let saved = msg.with_id("srv-1");
        assert_eq!(saved.id, "srv-1");
        assert_eq!(saved.text, "hello");
        assert_eq!(saved.timestamp, msg.timestamp);
        assert!(!saved.is_provisional());
    }

    #[test]
    fn chat_session_id_assigned_once() {
        let mut chat = ChatSession::unsaved();
        assert!(!chat.is_persisted());

        assert!(chat.assign_id(ChatId::new("c1"), "first"));
        assert_eq!(chat.id, Some(ChatId::new("c1")));

        assert!(!chat.assign_id(ChatId::new("c2"), "second"));
        assert_eq!(chat.id, Some(ChatId::new("c1")));
        assert_eq!(chat.title, "first");
    }

    #[test]
    fn tool_mode_defaults_to_disabled() {
        assert_eq!(ToolMode::default(), ToolMode::Disabled);
        assert!(ToolMode::Enabled.is_enabled());
        let parsed: ToolMode = serde_json::from_str("\"enabled\"").unwrap();
        assert_eq!(parsed, ToolMode::Enabled);
    }
}
