//! In-memory embedding index over the FAQ corpus

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use super::similarity::top_k_by_similarity;
use super::EmbeddingBackend;
use crate::errors::Result;

/// Dense vector index over a fixed corpus.
///
/// Vectors are stored 1:1 aligned with corpus order and are read-only after
/// construction; the only supported update path is a full rebuild from a new
/// corpus.
pub struct EmbeddingIndex {
    backend: Arc<dyn EmbeddingBackend>,
    documents: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingIndex {
    /// Build the index by encoding every corpus document in one batch.
    ///
    /// Encoding failures propagate unchanged; a partially built index is
    /// never returned.
    pub async fn build(
        backend: Arc<dyn EmbeddingBackend>,
        documents: Vec<String>,
    ) -> Result<Self> {
        info!("Building embedding index over {} documents", documents.len());
        let vectors = backend.encode(&documents).await?;
        debug_assert_eq!(vectors.len(), documents.len());

        Ok(Self {
            backend,
            documents,
            vectors,
        })
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Encode the question and return the `min(k, len)` most similar corpus
    /// positions with their cosine scores, best first. An oversized `k`
    /// returns all entries ranked; an empty index returns no results without
    /// calling the backend.
    pub async fn query(&self, question: &str, k: usize) -> Result<Vec<(usize, f32)>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        debug!("Querying index for: {}", question);
        let query_vectors = self.backend.encode(&[question.to_string()]).await?;
        let Some(query_vector) = query_vectors.first() else {
            return Ok(Vec::new());
        };

        Ok(top_k_by_similarity(query_vector, &self.vectors, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FaqRagError;

    /// Deterministic fake backend: maps known texts to fixed vectors
    struct StubBackend;

    #[async_trait::async_trait]
    impl EmbeddingBackend for StubBackend {
        async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| match t.as_str() {
                    "chien" => vec![1.0, 0.0],
                    "chat" => vec![0.9, 0.1],
                    _ => vec![0.0, 1.0],
                })
                .collect())
        }
    }

    struct FailingBackend;

    #[async_trait::async_trait]
    impl EmbeddingBackend for FailingBackend {
        async fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(FaqRagError::EmbeddingBackend("backend down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_build_and_query() {
        let docs = vec!["chien".to_string(), "chat".to_string(), "velo".to_string()];
        let index = EmbeddingIndex::build(Arc::new(StubBackend), docs).await.unwrap();
        assert_eq!(index.len(), 3);

        let results = index.query("chien", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert!(results[0].1 > results[1].1);
    }

    #[tokio::test]
    async fn test_query_oversized_k_returns_all() {
        let docs = vec!["chien".to_string(), "chat".to_string()];
        let index = EmbeddingIndex::build(Arc::new(StubBackend), docs).await.unwrap();
        let results = index.query("chien", 100).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_query_empty_index() {
        let index = EmbeddingIndex::build(Arc::new(StubBackend), Vec::new())
            .await
            .unwrap();
        assert!(index.is_empty());
        let results = index.query("chien", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_build_failure_propagates() {
        let docs = vec!["chien".to_string()];
        let result = EmbeddingIndex::build(Arc::new(FailingBackend), docs).await;
        assert!(matches!(result, Err(FaqRagError::EmbeddingBackend(_))));
    }
}
