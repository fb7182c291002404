use async_trait::async_trait;
use oap_common::{ChatId, Role};

use crate::records::{ChatDetail, ChatRecord, MessageRecord};
use crate::StoreError;

/// CRUD for chats and their messages.
///
/// Every operation either succeeds completely or fails; there are no partial writes.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// All chats, most recent first as the backend orders them.
    async fn list_chats(&self) -> Result<Vec<ChatRecord>, StoreError>;

    async fn get_chat(&self, id: &ChatId) -> Result<ChatDetail, StoreError>;

    async fn create_chat(&self, title: Option<&str>) -> Result<ChatRecord, StoreError>;

    async fn add_message(
        &self,
        chat_id: &ChatId,
        role: Role,
        content: &str,
    ) -> Result<MessageRecord, StoreError>;

    async fn update_chat_title(&self, id: &ChatId, title: &str) -> Result<ChatRecord, StoreError>;

    async fn delete_chat(&self, id: &ChatId) -> Result<(), StoreError>;
}
