use async_trait::async_trait;
use crate::models::chat::{ ChatMessage, Conversation, Role };
use crate::history::HistoryStore;
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-lifetime store. Nothing is evicted.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    conversations: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn get_or_create(&self, conversation_id: Option<&str>) -> (String, Vec<ChatMessage>) {
        let id = match conversation_id {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let mut conversations = self.conversations.write().await;
        let messages = conversations.entry(id.clone()).or_insert_with(|| {
            debug!("Opening conversation {}", id);
            Vec::new()
        });
        let snapshot = messages.clone();

        (id, snapshot)
    }

    async fn append(&self, conversation_id: &str, role: Role, content: &str) -> ChatMessage {
        let message = ChatMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp(),
        };

        let mut conversations = self.conversations.write().await;
        conversations.entry(conversation_id.to_string()).or_default().push(message.clone());

        message
    }

    async fn get_conversation(&self, conversation_id: &str) -> Option<Conversation> {
        let conversations = self.conversations.read().await;
        conversations.get(conversation_id).map(|messages| Conversation {
            id: conversation_id.to_string(),
            messages: messages.clone(),
        })
    }

    async fn message_count(&self, conversation_id: &str) -> usize {
        let conversations = self.conversations.read().await;
        conversations.get(conversation_id).map_or(0, Vec::len)
    }
}
