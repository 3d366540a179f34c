//! End-to-end benchmark flow over mock backends: run strategies on a golden
//! set, score them with scripted manual review, persist the ledgers and pick
//! the best strategy.

use std::io::Cursor;
use std::sync::Arc;

use faqrag::bench::ledger;
use faqrag::bench::recommend_best_strategy;
use faqrag::bench::runners::run_on_questions;
use faqrag::bench::GoldenSetEvaluator;
use faqrag::bench::LlmOnlyRunner;
use faqrag::bench::RagRunner;
use faqrag::embeddings::EmbeddingBackend;
use faqrag::llm::prompts;
use faqrag::llm::ChatMessage;
use faqrag::llm::DecodingParams;
use faqrag::llm::GenerationBackend;
use faqrag::models::FaqEntry;
use faqrag::models::GoldenQuestion;
use faqrag::Result;

/// Embeddings keyed on shared French keywords, so question/summary pairs
/// that talk about the same topic land close together.
struct TopicEmbeddings;

#[async_trait::async_trait]
impl EmbeddingBackend for TopicEmbeddings {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                let mut v = vec![0.1f32, 0.1, 0.1];
                if t.contains("mairie") {
                    v[0] = 5.0;
                }
                if t.contains("déchetterie") {
                    v[1] = 5.0;
                }
                v
            })
            .collect())
    }
}

/// LLM that answers with the FAQ answer when its context mentions the topic
struct ContextAwareLlm;

#[async_trait::async_trait]
impl GenerationBackend for ContextAwareLlm {
    async fn chat(&self, messages: &[ChatMessage], _params: DecodingParams) -> Result<String> {
        let system = &messages[0].content;
        if system.contains("déchetterie") {
            Ok("Bonjour, la déchetterie est ouverte du lundi au samedi.".to_string())
        } else {
            Ok(prompts::REFUSAL_SENTENCE.to_string())
        }
    }
}

fn faq_entries() -> Vec<FaqEntry> {
    serde_json::from_str(
        r#"[
            {"id": "faq-1", "question": "Où se trouve la mairie ?",
             "answer": "La mairie est place du marché.", "keywords": ["mairie"]},
            {"id": "faq-2", "question": "Quels sont les horaires de la déchetterie ?",
             "answer": "La déchetterie est ouverte du lundi au samedi.",
             "keywords": ["déchetterie"]}
        ]"#,
    )
    .unwrap()
}

fn golden_set() -> Vec<GoldenQuestion> {
    serde_json::from_str(
        r#"[
            {"question": "Quand puis-je aller à la déchetterie ?",
             "expected_answer_summary": "La déchetterie est ouverte du lundi au samedi.",
             "expected_keywords": ["déchetterie", "lundi"]}
        ]"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_full_benchmark_flow() {
    let embedding: Arc<dyn EmbeddingBackend> = Arc::new(TopicEmbeddings);
    let generation: Arc<dyn GenerationBackend> = Arc::new(ContextAwareLlm);
    let golden = golden_set();

    // Strategy 1: direct LLM, no retrieval, so the model refuses
    let llm_only = LlmOnlyRunner::new(generation.clone());
    let llm_rows = run_on_questions(
        &llm_only,
        &golden,
        Some(prompts::LLM_ONLY_SYSTEM_PROMPT),
        0.0,
    )
    .await;
    assert_eq!(llm_rows[0].answer_model.as_deref(), Some(prompts::REFUSAL_SENTENCE));

    // Strategy 2: RAG with the déchetterie entry retrieved into context
    let rag = RagRunner::build(embedding.clone(), faq_entries(), generation.clone(), 2)
        .await
        .unwrap();
    let rag_rows = run_on_questions(&rag, &golden, Some(prompts::RAG_BENCH_SYSTEM_PROMPT), 0.0).await;
    assert!(rag_rows[0]
        .answer_model
        .as_deref()
        .unwrap()
        .contains("déchetterie"));

    // Score both strategies with scripted manual review
    let evaluator = GoldenSetEvaluator::new(embedding, 1.0);

    let mut input = Cursor::new("0 x\n");
    let mut output = Vec::new();
    let (llm_records, llm_summary) = evaluator
        .evaluate("llm_only", &llm_rows, &mut input, &mut output)
        .await
        .unwrap();

    let mut input = Cursor::new("2 v\n");
    let mut output = Vec::new();
    let (rag_records, rag_summary) = evaluator
        .evaluate("rag", &rag_rows, &mut input, &mut output)
        .await
        .unwrap();

    // RAG found both keywords; the refusal found none
    assert_eq!(llm_records[0].keywords_proportion, 0.0);
    assert!((rag_records[0].keywords_proportion - 1.0).abs() < 1e-12);
    assert!(rag_records[0].similarity_answer > llm_records[0].similarity_answer);
    assert!(rag_summary.global_score > llm_summary.global_score);

    // Persist: detailed files plus the append-only summary ledger
    let dir = tempfile::tempdir().unwrap();
    let summary_path = dir.path().join("methods_scores_summary.csv");
    ledger::write_detailed_results(dir.path().join("llm-only-eval.csv"), &llm_records).unwrap();
    ledger::write_detailed_results(dir.path().join("rag-eval.csv"), &rag_records).unwrap();
    ledger::append_summary(&summary_path, &llm_summary).unwrap();
    ledger::append_summary(&summary_path, &rag_summary).unwrap();

    let persisted = ledger::read_summaries(&summary_path).unwrap();
    assert_eq!(persisted.len(), 2);

    let best = recommend_best_strategy(&persisted).unwrap();
    assert_eq!(best.method, "rag");
}
