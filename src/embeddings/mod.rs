//! Text embeddings: backend clients, cosine similarity and the corpus index

pub mod client;
pub mod index;
pub mod similarity;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use index::EmbeddingIndex;

use crate::errors::Result;

/// Capability contract for an embedding backend: encode a batch of texts
/// into fixed-length vectors, deterministic for identical input text and
/// model identity. Injected everywhere instead of a process-global client
/// so the core stays testable.
#[async_trait::async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub endpoint: String,
    pub api_token: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        // Local endpoints without a token are assumed to be Ollama
        let provider = if config.embedding_endpoint().contains("localhost")
            && config.embeddings.api_token.is_none()
        {
            EmbeddingProvider::Ollama
        } else {
            EmbeddingProvider::HuggingFace
        };

        Self {
            provider,
            model: config.embedding_model().to_string(),
            endpoint: config.embedding_endpoint().to_string(),
            api_token: config.embeddings.api_token.clone(),
        }
    }
}
