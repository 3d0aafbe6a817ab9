pub mod mock;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use super::{ ProviderConfig, ProviderError, ProviderKind };
use self::mock::MockChatClient;
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use crate::models::chat::ChatMessage;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Produces the assistant reply for `history` (oldest first).
    async fn generate(
        &self,
        history: &[ChatMessage],
        config: &ProviderConfig
    ) -> Result<String, ProviderError>;

    fn name(&self) -> &'static str;
}

pub fn new_client(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>, ProviderError> {
    let client: Arc<dyn ChatClient> = match config.kind {
        ProviderKind::Mock => Arc::new(MockChatClient),
        ProviderKind::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        ProviderKind::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

pub(crate) fn build_http_client(
    config: &ProviderConfig,
    headers: reqwest::header::HeaderMap
) -> Result<HttpClient, ProviderError> {
    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ProviderError::Client(e.to_string()))
}

/// Reads an error body for diagnostics, capped so a huge HTML page does not flood the logs.
pub(crate) async fn status_error(resp: reqwest::Response) -> ProviderError {
    let status = resp.status().as_u16();
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > 512 {
        let mut cut = 512;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    ProviderError::Status { status, body }
}
