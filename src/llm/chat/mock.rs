use async_trait::async_trait;
use super::ChatClient;
use crate::llm::{ ProviderConfig, ProviderError };
use crate::models::chat::{ ChatMessage, Role };

const GREETING_WORDS: [&str; 3] = ["hello", "hi", "hey"];
const FAREWELL_WORDS: [&str; 3] = ["bye", "goodbye", "see you"];
const HELP_WORDS: [&str; 2] = ["help", "what can you do"];

/// Canned replies keyed on the latest user message. No model behind it.
///
/// The echo reply also quotes the configured personality, so the output is a
/// function of both inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockChatClient;

impl MockChatClient {
    pub fn reply(history: &[ChatMessage], personality: &str) -> String {
        let latest = history.iter().rev().find(|msg| msg.role == Role::User);
        let Some(latest) = latest else {
            return "Hello! How can I help you today?".to_string();
        };

        let text = latest.content.to_lowercase();
        if GREETING_WORDS.iter().any(|w| text.contains(w)) {
            "Hello! I'm your personal AI assistant. How can I help you today?".to_string()
        } else if FAREWELL_WORDS.iter().any(|w| text.contains(w)) {
            "Goodbye! Feel free to reach out anytime you need assistance.".to_string()
        } else if text.contains('?') {
            "That's a great question! I'm currently running in mock mode. \
             Once connected to a real LLM, I'll give you detailed answers.".to_string()
        } else if HELP_WORDS.iter().any(|w| text.contains(w)) {
            "I can help you answer questions, take notes, set reminders, \
             and much more. What would you like to do?".to_string()
        } else if personality.trim().is_empty() {
            format!(
                "I understand you said: '{}'. I'm currently in mock mode, but I'm ready \
                 to do more once connected to a real AI model.",
                latest.content
            )
        } else {
            format!(
                "I understand you said: '{}'. I'm currently in mock mode, but I'm ready \
                 to do more once connected to a real AI model. My instructions: {}",
                latest.content,
                personality.trim()
            )
        }
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn generate(
        &self,
        history: &[ChatMessage],
        config: &ProviderConfig
    ) -> Result<String, ProviderError> {
        Ok(Self::reply(history, &config.personality))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> ChatMessage {
        ChatMessage { role: Role::User, content: content.to_string(), timestamp: 0 }
    }

    #[test]
    fn greets_on_hello() {
        let reply = MockChatClient::reply(&[user("Hello there")], "");
        assert!(reply.starts_with("Hello! I'm your personal AI assistant"));
    }

    #[test]
    fn farewell_wins_over_question() {
        let reply = MockChatClient::reply(&[user("goodbye?")], "");
        assert!(reply.starts_with("Goodbye!"));
    }

    #[test]
    fn questions_get_mock_mode_answer() {
        let reply = MockChatClient::reply(&[user("What is Rust?")], "");
        assert!(reply.contains("mock mode"));
    }

    #[test]
    fn falls_back_to_echo_with_user_casing() {
        let reply = MockChatClient::reply(&[user("Tell me more")], "");
        assert!(reply.starts_with("I understand you said: 'Tell me more'."));
    }

    #[test]
    fn uses_latest_user_message_only() {
        let history = vec![
            user("hello"),
            ChatMessage { role: Role::Assistant, content: "hey".into(), timestamp: 1 },
            user("Tell me more"),
        ];
        let reply = MockChatClient::reply(&history, "");
        assert!(reply.contains("Tell me more"));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let a = MockChatClient::reply(&[user("Plan my week")], "terse");
        let b = MockChatClient::reply(
            &[ChatMessage { role: Role::User, content: "Plan my week".into(), timestamp: 99 }],
            "terse"
        );
        assert_eq!(a, b);
    }

    #[test]
    fn empty_history_gets_plain_greeting() {
        assert_eq!(MockChatClient::reply(&[], "Be kind."), "Hello! How can I help you today?");
    }

    #[test]
    fn personality_shapes_echo_reply() {
        let history = [user("Plan my week")];
        let kind = MockChatClient::reply(&history, "Be kind.");
        let terse = MockChatClient::reply(&history, "Be terse.");

        assert_ne!(kind, terse);
        assert!(kind.ends_with("My instructions: Be kind."));
        assert!(kind.starts_with("I understand you said: 'Plan my week'."));
    }

    #[tokio::test]
    async fn generate_uses_configured_personality() {
        let config = ProviderConfig { personality: "Answer like a pirate.".into(), ..ProviderConfig::default() };
        let reply = MockChatClient.generate(&[user("Plan my week")], &config).await.unwrap();
        assert!(reply.ends_with("My instructions: Answer like a pirate."));
    }

    #[tokio::test]
    async fn generate_never_fails() {
        let reply = MockChatClient.generate(&[user("hi")], &ProviderConfig::default()).await;
        assert!(reply.is_ok());
    }
}
