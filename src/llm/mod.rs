//! Language model clients: chat generation and extractive QA

pub mod extraction;
pub mod prompts;

pub use extraction::ExtractionBackend;
pub use extraction::ExtractiveQaClient;
pub use extraction::SpanExtraction;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::FaqRagError;
use crate::errors::Result;

/// One message of a chat exchange
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Fixed decoding parameters for one generation call
#[derive(Debug, Clone, Copy)]
pub struct DecodingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl DecodingParams {
    /// Service-path parameters for grounded answers
    pub const GROUNDED: Self = Self {
        max_tokens: 512,
        temperature: 0.3,
        top_p: 0.9,
    };

    /// Benchmark parameters for direct and RAG-augmented generation
    pub const BENCHMARK: Self = Self {
        max_tokens: 1024,
        temperature: 0.7,
        top_p: 0.9,
    };
}

/// Capability contract for a chat-completion backend. Failures propagate as
/// `GenerationBackend` errors and are never retried internally.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], params: DecodingParams) -> Result<String>;
}

/// Client for an OpenAI-compatible chat-completions endpoint
pub struct LlmService {
    client: Client,
    endpoint: String,
    model: String,
    api_token: String,
}

impl LlmService {
    pub fn new(endpoint: &str, model: &str, api_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FaqRagError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let token = config.resolve_api_token()?;
        Self::new(config.llm_endpoint(), config.llm_model(), &token)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for LlmService {
    async fn chat(&self, messages: &[ChatMessage], params: DecodingParams) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            max_tokens: u32,
            temperature: f32,
            top_p: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Chat completion request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                max_tokens: params.max_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
            })
            .send()
            .await
            .map_err(|e| FaqRagError::GenerationBackend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FaqRagError::GenerationBackend(format!(
                "chat request failed with status {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FaqRagError::GenerationBackend(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                FaqRagError::GenerationBackend("chat response contained no choices".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_roles() {
        let sys = ChatMessage::system("règles");
        let user = ChatMessage::user("question");
        assert_eq!(sys.role, "system");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_decoding_presets() {
        assert_eq!(DecodingParams::GROUNDED.max_tokens, 512);
        assert!((DecodingParams::GROUNDED.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(DecodingParams::BENCHMARK.max_tokens, 1024);
        assert!((DecodingParams::BENCHMARK.top_p - 0.9).abs() < f32::EPSILON);
    }
}
