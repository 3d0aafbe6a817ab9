use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};

use super::{ build_http_client, status_error, ChatClient };
use crate::history::recent_window;
use crate::llm::{ ProviderConfig, ProviderError, ProviderKind };
use crate::models::chat::{ ChatMessage, Role };

pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAIChatClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        config: &ProviderConfig
    ) -> Result<Self, ProviderError> {
        let api_url = base_url.unwrap_or_else(|| DEFAULT_CHAT_URL.to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ProviderError::Client(format!("Invalid API key format: {}", e)))?
        );

        Ok(Self {
            http: build_http_client(config, headers)?,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(ProviderKind::OpenAI))?;

        Self::new(api_key, config.base_url.clone(), config)
    }

    /// Forwards the history as-is, prefixed with the personality unless the
    /// history already carries its own system message.
    fn build_messages(history: &[ChatMessage], personality: &str) -> Vec<OpenAIMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !history.iter().any(|msg| msg.role == Role::System) {
            messages.push(OpenAIMessage {
                role: Role::System.as_str().to_string(),
                content: personality.to_string(),
            });
        }
        messages.extend(
            history.iter().map(|msg| OpenAIMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            })
        );
        messages
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn generate(
        &self,
        history: &[ChatMessage],
        config: &ProviderConfig
    ) -> Result<String, ProviderError> {
        let window = recent_window(history, config.context_window);
        let req = OpenAIChatRequest {
            model: config.model.clone(),
            messages: Self::build_messages(window, &config.personality),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };
        debug!("OpenAI request: model={}, messages={}", req.model, req.messages.len());

        let resp = self.http.post(&self.base_url).json(&req).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let body: OpenAIResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("no content in first choice".into()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
