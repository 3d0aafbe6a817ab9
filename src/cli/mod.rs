use clap::Parser;
use std::time::Duration;

use crate::llm::{ ProviderConfig, ProviderKind, DEFAULT_PERSONALITY };
use log::warn;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (mock, openai, ollama)
    #[arg(long, env = "LLM_PROVIDER", default_value = "mock")]
    pub llm_provider: String,

    /// API Key for the OpenAI provider. Required when LLM_PROVIDER=openai.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Model name for OpenAI chat completion (e.g., gpt-3.5-turbo, gpt-4o)
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    pub openai_model: String,

    /// Chat completions endpoint override (e.g., an OpenAI-compatible proxy)
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Model name for the local Ollama server
    #[arg(long, env = "OLLAMA_MODEL", default_value = "llama3")]
    pub ollama_model: String,

    /// Ollama generate endpoint
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434/api/generate")]
    pub ollama_url: String,

    /// System prompt handed to every provider call.
    #[arg(long, env = "SYSTEM_PERSONALITY", default_value = DEFAULT_PERSONALITY)]
    pub system_personality: String,

    /// Number of most recent messages forwarded to the provider. 0 means the whole conversation.
    #[arg(long, env = "MAX_CONVERSATION_HISTORY", default_value = "10")]
    pub max_conversation_history: usize,

    /// Timeout in seconds for remote provider calls.
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "60")]
    pub provider_timeout_secs: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Host address for the HTTP server to listen on.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP server to listen on.
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,
}

impl Args {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the immutable provider configuration. Unknown provider names fall back to mock.
    pub fn provider_config(&self) -> ProviderConfig {
        let kind = match self.llm_provider.parse::<ProviderKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{}, falling back to mock.", e);
                ProviderKind::Mock
            }
        };

        let (model, base_url) = match kind {
            ProviderKind::Mock => ("mock".to_string(), None),
            ProviderKind::OpenAI => (self.openai_model.clone(), self.openai_base_url.clone()),
            ProviderKind::Ollama => (self.ollama_model.clone(), Some(self.ollama_url.clone())),
        };

        ProviderConfig {
            kind,
            model,
            personality: self.system_personality.clone(),
            api_key: self.openai_api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url,
            context_window: self.max_conversation_history,
            request_timeout: Duration::from_secs(self.provider_timeout_secs),
            ..ProviderConfig::default()
        }
    }
}
