pub mod chat;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PERSONALITY: &str =
    "You are a helpful, friendly, and intelligent personal assistant.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Mock,
    OpenAI,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mock => "mock",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseProviderKindError {
    message: String,
}

impl fmt::Display for ParseProviderKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseProviderKindError {}

impl FromStr for ProviderKind {
    type Err = ParseProviderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "openai" => Ok(ProviderKind::OpenAI),
            "ollama" => Ok(ProviderKind::Ollama),
            _ =>
                Err(ParseProviderKindError {
                    message: format!("Unknown provider '{}'", s),
                }),
        }
    }
}

/// Provider settings, built once at startup and shared read-only by every call.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    pub personality: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Most recent messages forwarded to the provider; 0 forwards everything.
    pub context_window: usize,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Mock,
            model: "mock".to_string(),
            personality: DEFAULT_PERSONALITY.to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 1000,
            context_window: 10,
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingApiKey(ProviderKind),
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("failed to build provider client: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAI));
        assert_eq!(" mock ".parse::<ProviderKind>(), Ok(ProviderKind::Mock));
        assert_eq!("ollama".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
    }

    #[test]
    fn unknown_provider_kind_is_rejected() {
        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown provider 'gemini'");
    }

    #[test]
    fn provider_kind_display_matches_wire_name() {
        assert_eq!(ProviderKind::OpenAI.to_string(), "openai");
        assert_eq!(serde_json::to_string(&ProviderKind::Ollama).unwrap(), "\"ollama\"");
    }
}
