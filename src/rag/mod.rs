//! Retrieval-augmented answering over the FAQ corpus
//!
//! - semantic retrieval of FAQ entries using the embedding index
//! - grounded prompt assembly with the retrieved context
//! - LLM-based answer generation with a no-context short circuit

pub mod pipeline;
pub mod retriever;

pub use pipeline::RagService;
pub use retriever::Retriever;

/// Result of one retrieval pass, produced per query and never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    /// Formatted context blocks in descending-similarity order
    pub context_text: String,
    /// FAQ entry ids aligned with the context blocks
    pub source_ids: Vec<String>,
    /// Raw top cosine similarity; not a calibrated probability
    pub confidence: f32,
}

impl RetrievalResult {
    /// The empty result: no context, no sources, zero confidence
    pub fn empty() -> Self {
        Self {
            context_text: String::new(),
            source_ids: Vec::new(),
            confidence: 0.0,
        }
    }
}
