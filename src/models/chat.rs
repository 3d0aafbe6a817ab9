use serde::{ Serialize, Deserialize };
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<ChatMessage>,
}

fn default_user_id() -> Option<String> {
    Some("default".to_string())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub provider: String,
    pub message_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub metadata: ResponseMetadata,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationView {
    pub conversation_id: String,
    pub messages: Vec<ChatMessage>,
    pub message_count: usize,
}

impl From<Conversation> for ConversationView {
    fn from(conversation: Conversation) -> Self {
        Self {
            message_count: conversation.messages.len(),
            conversation_id: conversation.id,
            messages: conversation.messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_optional_fields() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"Hello"}"#).unwrap();
        assert_eq!(req.message, "Hello");
        assert!(req.conversation_id.is_none());
        assert_eq!(req.user_id.as_deref(), Some("default"));
    }

    #[test]
    fn request_without_message_is_rejected() {
        assert!(serde_json::from_str::<ChatRequest>(r#"{"conversation_id":"abc"}"#).is_err());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage { role: Role::Assistant, content: "hi".into(), timestamp: 1 };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
