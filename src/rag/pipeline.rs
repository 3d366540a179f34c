//! Complete grounded answering pipeline: retrieve -> prompt -> generate

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use tracing::info;

use crate::errors::Result;
use crate::llm::prompts;
use crate::llm::ChatMessage;
use crate::llm::DecodingParams;
use crate::llm::GenerationBackend;
use crate::models::AnswerOutcome;
use crate::rag::Retriever;

/// Grounded question-answering service over the FAQ corpus
pub struct RagService {
    retriever: Retriever,
    generation: Arc<dyn GenerationBackend>,
    top_k: usize,
}

impl RagService {
    pub fn new(retriever: Retriever, generation: Arc<dyn GenerationBackend>, top_k: usize) -> Self {
        Self {
            retriever,
            generation,
            top_k,
        }
    }

    /// Answer a question grounded in the retrieved FAQ context.
    ///
    /// When retrieval produces no context the fixed apology is returned with
    /// zero confidence and the generation backend is never invoked; this is
    /// a deliberate cost and latency optimization, not an error path.
    pub async fn answer_question(&self, question: &str) -> Result<AnswerOutcome> {
        info!("Answering question: {}", question);
        let start = Instant::now();

        let retrieval = self.retriever.retrieve(question, self.top_k).await?;

        if retrieval.context_text.is_empty() {
            debug!("No context retrieved; returning apology without calling the LLM");
            return Ok(AnswerOutcome {
                answer: prompts::NO_CONTEXT_APOLOGY.to_string(),
                confidence: 0.0,
                sources: Vec::new(),
                latency_ms: start.elapsed().as_secs_f64() * 1000.0,
            });
        }

        let system_prompt = prompts::grounded_system_prompt(&retrieval.context_text);
        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(question),
        ];

        let answer = self
            .generation
            .chat(&messages, DecodingParams::GROUNDED)
            .await?;

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!("Question answered in {:.0} ms", latency_ms);

        Ok(AnswerOutcome {
            answer,
            confidence: retrieval.confidence,
            sources: retrieval.source_ids,
            latency_ms,
        })
    }
}
