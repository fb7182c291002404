//! Wire records exchanged with the chat backend.

use chrono::{DateTime, Utc};
use oap_common::{ChatId, ChatSession, Message, Role};
use serde::{Deserialize, Serialize};

/// Title shown for chats the backend stores without one.
pub const UNTITLED_CHAT: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub id: ChatId,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRecord {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED_CHAT,
        }
    }

    pub fn to_session(&self) -> ChatSession {
        ChatSession::persisted(self.id.clone(), self.display_title(), self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Message {
            id: record.id,
            role: record.role,
            text: record.content,
            timestamp: record.created_at,
        }
    }
}

/// A chat together with its messages, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDetail {
    #[serde(flatten)]
    pub chat: ChatRecord,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

impl ChatDetail {
    pub fn into_messages(self) -> Vec<Message> {
        self.messages.into_iter().map(Message::from).collect()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateChatBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddMessageBody<'a> {
    pub role: Role,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateTitleBody<'a> {
    pub title: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_detail_parses_camel_case() {
        let detail: ChatDetail = serde_json::from_value(json!({
            "id": "c1",
            "title": null,
            "createdAt": "2026-03-01T10:00:00Z",
            "updatedAt": "2026-03-01T10:05:00Z",
            "messages": [
                { "id": "m1", "role": "user", "content": "hello", "createdAt": "2026-03-01T10:00:01Z" },
                { "id": "m2", "role": "model", "content": "hi", "createdAt": "2026-03-01T10:00:02Z" }
            ]
        }))
        .unwrap();

        assert_eq!(detail.chat.id, ChatId::new("c1"));
        assert_eq!(detail.chat.display_title(), UNTITLED_CHAT);

        let messages = detail.into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].text, "hi");
        assert!(!messages[1].is_provisional());
    }

    #[test]
    fn chat_record_to_session_keeps_identity() {
        let record: ChatRecord = serde_json::from_value(json!({
            "id": "c9",
            "title": "Apply for a permit...",
            "createdAt": "2026-03-01T10:00:00Z",
            "updatedAt": "2026-03-01T10:00:00Z"
        }))
        .unwrap();
        let session = record.to_session();
        assert_eq!(session.id, Some(ChatId::new("c9")));
        assert_eq!(session.title, "Apply for a permit...");
        assert_eq!(session.created_at, record.created_at);
    }

    #[test]
    fn request_bodies_serialize() {
        assert_eq!(
            serde_json::to_value(CreateChatBody { title: None }).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(AddMessageBody {
                role: Role::Model,
                content: "ok"
            })
            .unwrap(),
            json!({ "role": "model", "content": "ok" })
        );
    }
}
