//! Durable chat and message storage.
//!
//! [`PersistenceGateway`] is the capability the session depends on;
//! [`HttpChatStore`] implements it against the chat backend's REST API.

mod gateway;
mod http;
mod records;

pub use gateway::PersistenceGateway;
pub use http::HttpChatStore;
pub use records::{ChatDetail, ChatRecord, MessageRecord, UNTITLED_CHAT};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<StoreError> for oap_common::ChatError {
    fn from(err: StoreError) -> Self {
        oap_common::ChatError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = StoreError::Status {
            status: 404,
            body: "chat not found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: chat not found");
    }

    #[test]
    fn store_error_maps_to_persistence() {
        let err: oap_common::ChatError = StoreError::Timeout.into();
        assert!(matches!(err, oap_common::ChatError::Persistence(_)));
    }
}
