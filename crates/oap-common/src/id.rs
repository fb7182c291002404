use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by ids assigned locally before the backend acknowledges a write.
pub const PROVISIONAL_PREFIX: &str = "local-";

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Id for an optimistic message that has not been persisted yet.
pub fn provisional_id() -> String {
    format!("{PROVISIONAL_PREFIX}{}", new_id())
}

pub fn is_provisional(id: &str) -> bool {
    id.starts_with(PROVISIONAL_PREFIX)
}

/// Backend-assigned identifier of a persisted chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn provisional_id_is_marked() {
        let id = provisional_id();
        assert!(is_provisional(&id));
        assert!(!is_provisional(&new_id()));
    }

    #[test]
    fn chat_id_display() {
        let id = ChatId::new("chat-42");
        assert_eq!(id.to_string(), "chat-42");
        assert_eq!(id.as_str(), "chat-42");
    }

    #[test]
    fn chat_id_serializes_as_plain_string() {
        let id = ChatId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: ChatId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn chat_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ChatId::new("a"));
        set.insert(ChatId::new("a"));
        assert_eq!(set.len(), 1);
    }
}
