// src/chat/store.rs

use async_trait::async_trait;
use dashmap::DashMap;

use crate::chat::models::{Chat, StoredMessage};

/// Transcript persistence seam. Durable storage is out of scope; the server
/// only needs get/save/append/delete and carries ownership on the record.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn get(&self, id: &str) -> Option<Chat>;
    async fn save(&self, chat: Chat);
    async fn append_messages(&self, id: &str, messages: Vec<StoredMessage>);
    /// Returns false when the id was unknown.
    async fn delete(&self, id: &str) -> bool;
}

/// Process-local store; transcripts live until restart.
#[derive(Default)]
pub struct InMemoryChatStore {
    chats: DashMap<String, Chat>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn get(&self, id: &str) -> Option<Chat> {
        self.chats.get(id).map(|c| c.clone())
    }

    async fn save(&self, chat: Chat) {
        self.chats.insert(chat.id.clone(), chat);
    }

    async fn append_messages(&self, id: &str, messages: Vec<StoredMessage>) {
        if let Some(mut chat) = self.chats.get_mut(id) {
            chat.messages.extend(messages);
        }
    }

    async fn delete(&self, id: &str) -> bool {
        self.chats.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn append_and_delete_roundtrip() {
        let store = InMemoryChatStore::new();
        store
            .save(Chat::new("c1".into(), "u1".into(), "hello".into()))
            .await;
        store
            .append_messages("c1", vec![StoredMessage::new("user", json!("hi"))])
            .await;

        let chat = store.get("c1").await.unwrap();
        assert_eq!(chat.user_id, "u1");
        assert_eq!(chat.messages.len(), 1);

        assert!(store.delete("c1").await);
        assert!(!store.delete("c1").await);
        assert!(store.get("c1").await.is_none());
    }
}
