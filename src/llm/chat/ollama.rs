use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use reqwest::header::HeaderMap;
use serde::{ Deserialize, Serialize };

use super::{ build_http_client, status_error, ChatClient };
use crate::history::{ format_history_for_prompt, recent_window };
use crate::llm::{ ProviderConfig, ProviderError };
use crate::models::chat::ChatMessage;

pub const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    generate_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl OllamaClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let url = config.base_url.clone().unwrap_or_else(|| DEFAULT_GENERATE_URL.into());

        Ok(Self {
            http: build_http_client(config, HeaderMap::new())?,
            generate_url: url,
        })
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn generate(
        &self,
        history: &[ChatMessage],
        config: &ProviderConfig
    ) -> Result<String, ProviderError> {
        let window = recent_window(history, config.context_window);
        let req = GenerateRequest {
            model: config.model.clone(),
            prompt: format_history_for_prompt(window, &config.personality),
            stream: false,
        };
        debug!("Ollama request: model={}, prompt_len={}", req.model, req.prompt.len());

        let resp = self.http.post(&self.generate_url).json(&req).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let data: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        data.response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("missing 'response' field".into()))
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
