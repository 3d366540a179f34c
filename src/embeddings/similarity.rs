//! Cosine similarity and top-k ranking over flat in-memory vectors

/// Cosine similarity between two vectors; 0.0 when either norm is zero
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank all `vectors` against `query` by cosine similarity and return the
/// top `min(k, len)` `(index, score)` pairs in descending score order.
///
/// Equal scores keep the lower corpus index first, so ranking is
/// deterministic regardless of how the vectors were produced.
pub fn top_k_by_similarity(query: &[f32], vectors: &[Vec<f32>], k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = vectors
        .iter()
        .enumerate()
        .map(|(idx, v)| (idx, cosine_similarity(query, v)))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    scored.truncate(std::cmp::min(k, vectors.len()));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_top_k_ranking() {
        let query = vec![1.0, 0.0];
        let vectors = vec![
            vec![0.0, 1.0], // orthogonal
            vec![1.0, 0.0], // identical
            vec![1.0, 1.0], // in between
        ];
        let top = top_k_by_similarity(&query, &vectors, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 1);
        assert_eq!(top[1].0, 2);
        assert!(top[0].1 > top[1].1);
    }

    #[test]
    fn test_top_k_capped_at_corpus_size() {
        let query = vec![1.0];
        let vectors = vec![vec![1.0], vec![0.5]];
        let top = top_k_by_similarity(&query, &vectors, 10);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_top_k_tie_breaks_by_corpus_order() {
        let query = vec![1.0, 0.0];
        // Indices 0 and 2 tie exactly; 0 must come first
        let vectors = vec![vec![2.0, 0.0], vec![0.0, 1.0], vec![3.0, 0.0]];
        let top = top_k_by_similarity(&query, &vectors, 3);
        assert_eq!(top[0].0, 0);
        assert_eq!(top[1].0, 2);
        assert_eq!(top[2].0, 1);
    }

    #[test]
    fn test_top_k_empty_corpus() {
        let top = top_k_by_similarity(&[1.0], &[], 5);
        assert!(top.is_empty());
    }
}
