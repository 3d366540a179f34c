//! Benchmarking harness: answering strategies, golden-set evaluation and
//! the append-only results ledgers

pub mod evaluator;
pub mod ledger;
pub mod runners;

pub use evaluator::GoldenSetEvaluator;
pub use runners::AnswerStrategy;
pub use runners::ExtractiveRunner;
pub use runners::LlmOnlyRunner;
pub use runners::RagRunner;

use crate::models::StrategySummary;

/// Pick the strategy with the highest mean global score.
///
/// Ties resolve to the first-seen summary (strict greater-than comparison).
pub fn recommend_best_strategy(summaries: &[StrategySummary]) -> Option<&StrategySummary> {
    let mut best: Option<&StrategySummary> = None;
    for summary in summaries {
        match best {
            Some(current) if summary.global_score <= current.global_score => {}
            _ => best = Some(summary),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(method: &str, global: f64) -> StrategySummary {
        StrategySummary {
            method: method.to_string(),
            keywords_mean: 0.0,
            similarity_mean: 0.0,
            exactitude_score: 0.0,
            pertinence_mean: 0.0,
            hallucinations_rate: 0.0,
            latence_mean: 0.0,
            latence_score: 0.0,
            complexite_score: 1.0,
            global_score: global,
        }
    }

    #[test]
    fn test_recommend_best_strategy() {
        let summaries = vec![summary("llm_only", 0.6), summary("rag", 0.8), summary("extractive", 0.7)];
        assert_eq!(recommend_best_strategy(&summaries).unwrap().method, "rag");
    }

    #[test]
    fn test_recommend_tie_keeps_first_seen() {
        let summaries = vec![summary("llm_only", 0.7), summary("rag", 0.7)];
        assert_eq!(recommend_best_strategy(&summaries).unwrap().method, "llm_only");
    }

    #[test]
    fn test_recommend_empty() {
        assert!(recommend_best_strategy(&[]).is_none());
    }
}
