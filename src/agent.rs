use crate::error::ChatError;
use crate::history::{ HistoryStore, InMemoryHistoryStore };
use crate::llm::ProviderConfig;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::{ ChatRequest, ChatResponse, ConversationView, ResponseMetadata, Role };

use log::{ info, error };
use std::error::Error;
use std::sync::Arc;

/// Ties the history store to the configured provider.
#[derive(Clone)]
pub struct ChatAgent {
    chat_client: Arc<dyn ChatClient>,
    history_store: Arc<dyn HistoryStore>,
    provider_config: Arc<ProviderConfig>,
}

impl ChatAgent {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        history_store: Arc<dyn HistoryStore>,
        provider_config: ProviderConfig
    ) -> Self {
        Self {
            chat_client,
            history_store,
            provider_config: Arc::new(provider_config),
        }
    }

    /// Builds the provider from `provider_config` over a fresh in-memory store.
    pub fn from_config(provider_config: ProviderConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_client = new_chat_client(&provider_config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={}",
            provider_config.kind,
            provider_config.model,
            provider_config.base_url.as_deref().unwrap_or("adapter default")
        );
        let history_store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
        Ok(Self::new(chat_client, history_store, provider_config))
    }

    pub fn provider_name(&self) -> &'static str {
        self.chat_client.name()
    }

    pub fn history_store(&self) -> &Arc<dyn HistoryStore> {
        &self.history_store
    }

    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        if request.message.trim().is_empty() {
            return Err(ChatError::Validation("message must not be empty".into()));
        }

        // A blank id counts as absent and gets a fresh one.
        let requested_id = request.conversation_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());
        let (conversation_id, _) = self.history_store.get_or_create(requested_id).await;

        self.history_store.append(&conversation_id, Role::User, &request.message).await;

        // The store hands back a snapshot, so no lock is held across the provider call.
        let history = self.history_store
            .get_conversation(&conversation_id).await
            .map(|conversation| conversation.messages)
            .unwrap_or_default();

        let response_text = match
            self.chat_client.generate(&history, &self.provider_config).await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Provider '{}' failed for conversation {}: {}", self.provider_name(), conversation_id, e);
                return Err(e.into());
            }
        };

        self.history_store.append(&conversation_id, Role::Assistant, &response_text).await;
        let message_count = self.history_store.message_count(&conversation_id).await;

        info!(
            "Chat request processed: conversation_id={}, user_id={}",
            conversation_id,
            request.user_id.as_deref().unwrap_or("default")
        );

        Ok(ChatResponse {
            response: response_text,
            conversation_id,
            metadata: ResponseMetadata {
                provider: self.provider_name().to_string(),
                message_count,
            },
        })
    }

    pub async fn conversation(&self, conversation_id: &str) -> Result<ConversationView, ChatError> {
        self.history_store
            .get_conversation(conversation_id).await
            .map(ConversationView::from)
            .ok_or_else(|| ChatError::NotFound("Conversation not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderError;
    use crate::models::chat::ChatMessage;
    use async_trait::async_trait;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    struct FailingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatClient for FailingClient {
        async fn generate(
            &self,
            _history: &[ChatMessage],
            _config: &ProviderConfig
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::MalformedResponse("boom".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn request(message: &str, conversation_id: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
            user_id: None,
        }
    }

    fn mock_agent() -> ChatAgent {
        ChatAgent::from_config(ProviderConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn new_conversation_has_two_messages() {
        let agent = mock_agent();
        let resp = agent.handle_chat(request("Hello", None)).await.unwrap();

        assert!(!resp.response.is_empty());
        assert_eq!(resp.metadata.provider, "mock");
        assert_eq!(resp.metadata.message_count, 2);

        let view = agent.conversation(&resp.conversation_id).await.unwrap();
        assert_eq!(view.messages[0].role, Role::User);
        assert_eq!(view.messages[0].content, "Hello");
        assert_eq!(view.messages[1].role, Role::Assistant);
        assert_eq!(view.messages[1].content, resp.response);
    }

    #[tokio::test]
    async fn reused_id_grows_by_two() {
        let agent = mock_agent();
        let first = agent.handle_chat(request("Hello", None)).await.unwrap();
        let id = first.conversation_id.clone();

        for expected in [4, 6, 8] {
            let next = agent.handle_chat(request("Tell me more", Some(&id))).await.unwrap();
            assert_eq!(next.conversation_id, id);
            assert_eq!(next.metadata.message_count, expected);
        }
    }

    #[tokio::test]
    async fn fresh_ids_are_unique() {
        let agent = mock_agent();
        let a = agent.handle_chat(request("Hello", None)).await.unwrap();
        let b = agent.handle_chat(request("Hello", None)).await.unwrap();
        assert_ne!(a.conversation_id, b.conversation_id);
    }

    #[tokio::test]
    async fn blank_conversation_id_gets_fresh_id() {
        let agent = mock_agent();
        let a = agent.handle_chat(request("Hello", Some(""))).await.unwrap();
        let b = agent.handle_chat(request("Hello", Some("  "))).await.unwrap();

        assert!(!a.conversation_id.trim().is_empty());
        assert!(!b.conversation_id.trim().is_empty());
        assert_ne!(a.conversation_id, b.conversation_id);
        assert_eq!(a.metadata.message_count, 2);
        assert_eq!(b.metadata.message_count, 2);
        assert!(agent.history_store().get_conversation("").await.is_none());
    }

    #[tokio::test]
    async fn blank_message_skips_provider_and_store() {
        let client = Arc::new(FailingClient { calls: AtomicUsize::new(0) });
        let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
        let agent = ChatAgent::new(client.clone(), store.clone(), ProviderConfig::default());

        let err = agent.handle_chat(request("   ", Some("c1"))).await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert!(store.get_conversation("c1").await.is_none());
    }

    #[tokio::test]
    async fn provider_failure_keeps_user_message() {
        let client = Arc::new(FailingClient { calls: AtomicUsize::new(0) });
        let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
        let agent = ChatAgent::new(client, store.clone(), ProviderConfig::default());

        let err = agent.handle_chat(request("Hello", Some("c1"))).await.unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));

        let conversation = store.get_conversation("c1").await.unwrap();
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let agent = mock_agent();
        assert!(matches!(agent.conversation("missing").await, Err(ChatError::NotFound(_))));
    }
}
