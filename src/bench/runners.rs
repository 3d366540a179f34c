//! Answering strategies benchmarked against the golden set
//!
//! Each strategy is a trait object with one operation, `answer_one`. The
//! batch driver processes golden questions sequentially, catches per-row
//! backend failures (recording a None answer with the latency measured up
//! to the failure) and optionally pauses between rows to respect external
//! rate limits.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use tracing::warn;

use crate::embeddings::EmbeddingBackend;
use crate::embeddings::EmbeddingIndex;
use crate::errors::Result;
use crate::llm::prompts;
use crate::llm::ChatMessage;
use crate::llm::DecodingParams;
use crate::llm::ExtractionBackend;
use crate::llm::GenerationBackend;
use crate::models::FaqEntry;
use crate::models::GoldenQuestion;
use crate::models::StrategyAnswerRow;
use crate::rag::Retriever;

/// Capability of an answer-producing strategy: one question plus an optional
/// system instruction in, answer text out.
#[async_trait::async_trait]
pub trait AnswerStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn answer_one(&self, question: &str, system_prompt: Option<&str>) -> Result<String>;
}

/// Direct LLM strategy: no retrieval, question goes straight to the model
pub struct LlmOnlyRunner {
    generation: Arc<dyn GenerationBackend>,
}

impl LlmOnlyRunner {
    pub fn new(generation: Arc<dyn GenerationBackend>) -> Self {
        Self { generation }
    }
}

#[async_trait::async_trait]
impl AnswerStrategy for LlmOnlyRunner {
    fn name(&self) -> &str {
        "llm_only"
    }

    async fn answer_one(&self, question: &str, system_prompt: Option<&str>) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = system_prompt {
            messages.push(ChatMessage::system(system_prompt));
        }
        messages.push(ChatMessage::user(question));

        self.generation
            .chat(&messages, DecodingParams::BENCHMARK)
            .await
    }
}

/// Retrieval-augmented strategy.
///
/// The benchmark variant indexes the FAQ *questions* only (not the full
/// corpus documents) and appends lightweight `- Q: / R:` context blocks to
/// the provided system prompt.
pub struct RagRunner {
    index: EmbeddingIndex,
    entries: Vec<FaqEntry>,
    generation: Arc<dyn GenerationBackend>,
    top_k: usize,
}

impl RagRunner {
    /// Build the question index once, up front
    pub async fn build(
        embedding: Arc<dyn EmbeddingBackend>,
        entries: Vec<FaqEntry>,
        generation: Arc<dyn GenerationBackend>,
        top_k: usize,
    ) -> Result<Self> {
        let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();
        let index = EmbeddingIndex::build(embedding, questions).await?;

        Ok(Self {
            index,
            entries,
            generation,
            top_k,
        })
    }

    async fn build_context(&self, question: &str) -> Result<String> {
        let ranked = self.index.query(question, self.top_k).await?;
        let chunks: Vec<String> = ranked
            .iter()
            .map(|(idx, _)| {
                let entry = &self.entries[*idx];
                format!("- Q: {}\n  R: {}", entry.question, entry.answer)
            })
            .collect();
        Ok(chunks.join("\n"))
    }
}

#[async_trait::async_trait]
impl AnswerStrategy for RagRunner {
    fn name(&self) -> &str {
        "rag"
    }

    async fn answer_one(&self, question: &str, system_prompt: Option<&str>) -> Result<String> {
        let context = self.build_context(question).await?;
        let rag_system_prompt =
            prompts::with_bench_context(system_prompt.unwrap_or(""), &context);

        let messages = [
            ChatMessage::system(rag_system_prompt),
            ChatMessage::user(question),
        ];

        self.generation
            .chat(&messages, DecodingParams::BENCHMARK)
            .await
    }
}

/// Extractive strategy: the span-extraction backend selects a substring of
/// the raw concatenated answer texts of the retrieved entries.
pub struct ExtractiveRunner {
    retriever: Arc<Retriever>,
    extraction: Arc<dyn ExtractionBackend>,
    top_k: usize,
}

impl ExtractiveRunner {
    pub fn new(
        retriever: Arc<Retriever>,
        extraction: Arc<dyn ExtractionBackend>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            extraction,
            top_k,
        }
    }
}

#[async_trait::async_trait]
impl AnswerStrategy for ExtractiveRunner {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn answer_one(&self, question: &str, _system_prompt: Option<&str>) -> Result<String> {
        let context = self
            .retriever
            .retrieve_raw_answers(question, self.top_k)
            .await?;

        if context.is_empty() {
            return Ok(prompts::NO_SPAN_FALLBACK.to_string());
        }

        let extraction = self.extraction.extract(question, &context).await?;
        if extraction.is_impossible {
            return Ok(prompts::NO_SPAN_FALLBACK.to_string());
        }

        Ok(extraction.answer)
    }
}

/// Run one strategy over the golden set, sequentially and in input order.
///
/// A failed row is logged and recorded with a None answer; the batch never
/// aborts because of one bad backend call.
pub async fn run_on_questions(
    strategy: &dyn AnswerStrategy,
    questions: &[GoldenQuestion],
    system_prompt: Option<&str>,
    delay_seconds: f64,
) -> Vec<StrategyAnswerRow> {
    let mut rows = Vec::with_capacity(questions.len());

    for (idx, golden) in questions.iter().enumerate() {
        info!(
            "[{}] {} inference on question: {:?}",
            idx,
            strategy.name(),
            golden.question
        );

        let start = Instant::now();
        let answer = match strategy.answer_one(&golden.question, system_prompt).await {
            Ok(answer) => Some(answer),
            Err(e) => {
                warn!("Inference failed on row {}: {}", idx, e);
                None
            }
        };
        let latency_seconds = start.elapsed().as_secs_f64();

        rows.push(StrategyAnswerRow {
            question: golden.question.clone(),
            expected_answer_summary: golden.expected_answer_summary.clone(),
            expected_keywords: golden.expected_keywords.clone(),
            answer_model: answer,
            latency_seconds,
        });

        if delay_seconds > 0.0 {
            tokio::time::sleep(std::time::Duration::from_secs_f64(delay_seconds)).await;
        }
    }

    rows
}
