//! Embedding API clients for the supported providers

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::EmbeddingBackend;
use super::EmbeddingConfig;
use crate::errors::FaqRagError;
use crate::errors::Result;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Hugging Face Inference API feature-extraction pipeline
    HuggingFace,
    /// Ollama local embeddings
    Ollama,
}

/// Client for generating embeddings from a hosted provider
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_token: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FaqRagError::Http(e.to_string()))?;

        Ok(Self {
            provider: config.provider,
            model: config.model,
            endpoint: config.endpoint,
            api_token: config.api_token,
            client,
        })
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Backend failures propagate unchanged; there is no silent retry.
    async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        match self.provider {
            EmbeddingProvider::HuggingFace => self.generate_batch_hf(texts).await,
            EmbeddingProvider::Ollama => {
                // Ollama has no batch endpoint; bounded concurrency instead
                use futures::stream;
                use futures::stream::StreamExt;

                let concurrency = std::cmp::min(texts.len(), 8);
                let futures: Vec<_> = texts.iter().map(|text| self.generate_ollama(text)).collect();
                let results: Vec<Result<Vec<f32>>> = stream::iter(futures)
                    .buffered(concurrency)
                    .collect()
                    .await;

                let mut embeddings = Vec::with_capacity(results.len());
                for result in results {
                    embeddings.push(result?);
                }

                Ok(embeddings)
            }
        }
    }

    /// Generate embeddings via the HF feature-extraction pipeline
    async fn generate_batch_hf(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct HfRequest<'a> {
            inputs: &'a [String],
        }

        let url = format!(
            "{}/models/{}/pipeline/feature-extraction",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        debug!("Requesting {} embeddings from {}", texts.len(), url);

        let mut request = self.client.post(&url).json(&HfRequest { inputs: texts });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FaqRagError::EmbeddingBackend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FaqRagError::EmbeddingBackend(format!(
                "embedding request failed with status {status}: {body}"
            )));
        }

        let embeddings: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| FaqRagError::EmbeddingBackend(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(FaqRagError::EmbeddingBackend(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    /// Generate one embedding via the Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&OllamaRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| FaqRagError::EmbeddingBackend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FaqRagError::EmbeddingBackend(format!(
                "embedding request failed with status {status}: {body}"
            )));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| FaqRagError::EmbeddingBackend(e.to_string()))?;

        Ok(parsed.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingBackend for EmbeddingClient {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.generate_batch(texts).await
    }
}
