//! Semantic retrieval of FAQ entries

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingIndex;
use crate::errors::Result;
use crate::models::FaqEntry;
use crate::rag::RetrievalResult;

/// Retriever over a built embedding index and its source FAQ entries.
///
/// Entries and index are position-aligned: the index was built from the
/// corpus documents of exactly these entries, in this order.
pub struct Retriever {
    index: Arc<EmbeddingIndex>,
    entries: Arc<Vec<FaqEntry>>,
}

impl Retriever {
    pub fn new(index: Arc<EmbeddingIndex>, entries: Arc<Vec<FaqEntry>>) -> Self {
        debug_assert_eq!(index.len(), entries.len());
        Self { index, entries }
    }

    /// Retrieve the `top_k` most relevant FAQ entries for a question.
    ///
    /// No minimum-similarity filtering happens here: even a low-confidence
    /// set is returned and the caller decides what "no usable context"
    /// means. An empty corpus short-circuits to the empty result without
    /// calling the embedding backend.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<RetrievalResult> {
        if self.entries.is_empty() {
            return Ok(RetrievalResult::empty());
        }

        let ranked = self.index.query(question, top_k).await?;
        if ranked.is_empty() {
            return Ok(RetrievalResult::empty());
        }

        debug!("Retrieved {} entries for question", ranked.len());

        let confidence = ranked[0].1;
        let mut context_chunks = Vec::with_capacity(ranked.len());
        let mut source_ids = Vec::with_capacity(ranked.len());

        for (idx, _score) in &ranked {
            let entry = &self.entries[*idx];
            context_chunks.push(format!(
                "- Catégorie: {}\n  Mots-clés: {}\n  Q: {}\n  R: {}",
                entry.category_or_empty(),
                entry.keywords_joined(),
                entry.question,
                entry.answer,
            ));
            source_ids.push(entry.id.clone());
        }

        Ok(RetrievalResult {
            context_text: context_chunks.join("\n\n"),
            source_ids,
            confidence,
        })
    }

    /// Raw concatenated answer texts of the `top_k` retrieved entries, used
    /// by the extractive strategy (unformatted, answers only).
    pub async fn retrieve_raw_answers(&self, question: &str, top_k: usize) -> Result<String> {
        if self.entries.is_empty() {
            return Ok(String::new());
        }

        let ranked = self.index.query(question, top_k).await?;
        let answers: Vec<&str> = ranked
            .iter()
            .map(|(idx, _)| self.entries[*idx].answer.as_str())
            .collect();

        Ok(answers.join(" "))
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }
}
