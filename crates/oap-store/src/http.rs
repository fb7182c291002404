//! REST client for the chat backend.

use std::time::Duration;

use async_trait::async_trait;
use oap_common::{ChatId, Role};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::gateway::PersistenceGateway;
use crate::records::{
    AddMessageBody, ChatDetail, ChatRecord, CreateChatBody, MessageRecord, UpdateTitleBody,
};
use crate::StoreError;

pub struct HttpChatStore {
    http: reqwest::Client,
    base: Url,
}

impl HttpChatStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base = Url::parse(base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(format!(
                "{base_url} cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout
            } else {
                StoreError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PersistenceGateway for HttpChatStore {
    async fn list_chats(&self) -> Result<Vec<ChatRecord>, StoreError> {
        let chats: Vec<ChatRecord> = self.send_json(self.http.get(self.url(&["chats"]))).await?;
        debug!(count = chats.len(), "chats listed");
        Ok(chats)
    }

    async fn get_chat(&self, id: &ChatId) -> Result<ChatDetail, StoreError> {
        self.send_json(self.http.get(self.url(&["chats", id.as_str()])))
            .await
    }

    async fn create_chat(&self, title: Option<&str>) -> Result<ChatRecord, StoreError> {
        let chat: ChatRecord = self
            .send_json(
                self.http
                    .post(self.url(&["chats"]))
                    .json(&CreateChatBody { title }),
            )
            .await?;
        debug!(chat = %chat.id, "chat created");
        Ok(chat)
    }

    async fn add_message(
        &self,
        chat_id: &ChatId,
        role: Role,
        content: &str,
    ) -> Result<MessageRecord, StoreError> {
        self.send_json(
            self.http
                .post(self.url(&["chats", chat_id.as_str(), "messages"]))
                .json(&AddMessageBody { role, content }),
        )
        .await
    }

    async fn update_chat_title(&self, id: &ChatId, title: &str) -> Result<ChatRecord, StoreError> {
        self.send_json(
            self.http
                .patch(self.url(&["chats", id.as_str()]))
                .json(&UpdateTitleBody { title }),
        )
        .await
    }

    async fn delete_chat(&self, id: &ChatId) -> Result<(), StoreError> {
        self.send(self.http.delete(self.url(&["chats", id.as_str()])))
            .await?;
        debug!(chat = %id, "chat deleted");
        Ok(())
    }
}
