mod memory;
use async_trait::async_trait;
use crate::models::chat::{ ChatMessage, Conversation, Role };

pub use memory::InMemoryHistoryStore;

/// Conversation-keyed message storage.
///
/// Unknown ids are never an error for writers: `get_or_create` and `append`
/// both open a fresh conversation on first reference.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns the id (generated when `None`) and a snapshot of its messages.
    async fn get_or_create(&self, conversation_id: Option<&str>) -> (String, Vec<ChatMessage>);

    async fn append(&self, conversation_id: &str, role: Role, content: &str) -> ChatMessage;

    async fn get_conversation(&self, conversation_id: &str) -> Option<Conversation>;

    async fn message_count(&self, conversation_id: &str) -> usize;
}

/// Flattens a history into a single completion prompt for text-only backends.
pub fn format_history_for_prompt(messages: &[ChatMessage], personality: &str) -> String {
    let mut result = format!("System: {}\n\n", personality);
    for msg in messages {
        let role_display = match msg.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        };

        result.push_str(&format!("{}: {}\n", role_display, msg.content));
    }
    result.push_str("Assistant:");

    result
}

/// Keeps only the newest `window` messages; a window of 0 keeps everything.
pub fn recent_window(messages: &[ChatMessage], window: usize) -> &[ChatMessage] {
    if window == 0 || messages.len() <= window {
        return messages;
    }
    &messages[messages.len() - window..]
}
