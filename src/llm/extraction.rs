//! Extractive question answering over a span-extraction backend

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::FaqRagError;
use crate::errors::Result;

/// Result of one span-extraction call: either a literal substring of the
/// supplied context, or an explicit "no answerable span" signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanExtraction {
    pub answer: String,
    pub is_impossible: bool,
}

/// Capability contract for a span-extraction backend
#[async_trait::async_trait]
pub trait ExtractionBackend: Send + Sync {
    async fn extract(&self, question: &str, context: &str) -> Result<SpanExtraction>;
}

/// Client for the HF question-answering pipeline
pub struct ExtractiveQaClient {
    client: Client,
    endpoint: String,
    model: String,
    api_token: Option<String>,
}

impl ExtractiveQaClient {
    pub fn new(endpoint: &str, model: &str, api_token: Option<String>) -> Result<Self> {
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
            api_token,
        })
    }
}

#[async_trait::async_trait]
impl ExtractionBackend for ExtractiveQaClient {
    async fn extract(&self, question: &str, context: &str) -> Result<SpanExtraction> {
        #[derive(Serialize)]
        struct QaInputs<'a> {
            question: &'a str,
            context: &'a str,
        }

        #[derive(Serialize)]
        struct QaRequest<'a> {
            inputs: QaInputs<'a>,
        }

        #[derive(Deserialize)]
        struct QaResponse {
            answer: String,
            #[allow(dead_code)]
            score: f32,
        }

        let url = format!(
            "{}/models/{}/pipeline/question-answering",
            self.endpoint, self.model
        );
        debug!("Extractive QA request to {}", url);

        let mut request = self.client.post(&url).json(&QaRequest {
            inputs: QaInputs { question, context },
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FaqRagError::ExtractionBackend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FaqRagError::ExtractionBackend(format!(
                "extraction request failed with status {status}: {body}"
            )));
        }

        let parsed: QaResponse = response
            .json()
            .await
            .map_err(|e| FaqRagError::ExtractionBackend(e.to_string()))?;

        // SQuAD-v2 style models signal an unanswerable question with an
        // empty span
        let answer = parsed.answer.trim().to_string();
        let is_impossible = answer.is_empty();

        Ok(SpanExtraction {
            answer,
            is_impossible,
        })
    }
}
