//! Append-only CSV ledgers for evaluation results
//!
//! A new evaluation run appends to the summary ledger keyed by method name;
//! prior rows are never overwritten. Detailed per-row results are written to
//! one file per strategy per run.

use std::path::Path;

use tracing::info;

use crate::errors::Result;
use crate::models::EvaluationRecord;
use crate::models::StrategySummary;

/// Write one run's detailed per-row records
pub fn write_detailed_results<P: AsRef<Path>>(
    path: P,
    records: &[EvaluationRecord],
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Detailed evaluation results written to {}", path.display());
    Ok(())
}

/// Append one strategy summary to the ledger, preserving all prior rows.
///
/// The ledger is the only mutable shared artifact of the benchmark; writes
/// are one whole-file rewrite per run, serialized by the single-threaded
/// caller.
pub fn append_summary<P: AsRef<Path>>(path: P, summary: &StrategySummary) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut rows: Vec<StrategySummary> = if path.exists() {
        let mut reader = csv::Reader::from_path(path)?;
        reader.deserialize().collect::<std::result::Result<_, _>>()?
    } else {
        Vec::new()
    };

    rows.push(summary.clone());

    let mut writer = csv::Writer::from_path(path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(
        "Summary for method '{}' appended to {}",
        summary.method,
        path.display()
    );
    Ok(())
}

/// Read the whole summary ledger
pub fn read_summaries<P: AsRef<Path>>(path: P) -> Result<Vec<StrategySummary>> {
    let mut reader = csv::Reader::from_path(path)?;
    Ok(reader.deserialize().collect::<std::result::Result<_, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(method: &str, global: f64) -> StrategySummary {
        StrategySummary {
            method: method.to_string(),
            keywords_mean: 0.5,
            similarity_mean: 0.6,
            exactitude_score: 0.55,
            pertinence_mean: 1.5,
            hallucinations_rate: 0.0,
            latence_mean: 1.2,
            latence_score: 0.45,
            complexite_score: 1.0,
            global_score: global,
        }
    }

    #[test]
    fn test_append_summary_preserves_prior_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("methods_scores_summary.csv");

        append_summary(&path, &summary("llm_only", 0.6)).unwrap();
        append_summary(&path, &summary("rag", 0.8)).unwrap();
        // A later run for the same method appends, never overwrites
        append_summary(&path, &summary("rag", 0.81)).unwrap();

        let rows = read_summaries(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].method, "llm_only");
        assert_eq!(rows[1].method, "rag");
        assert!((rows[2].global_score - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_write_detailed_results_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rag-eval.csv");

        let record = EvaluationRecord {
            question: "Q ?".to_string(),
            expected_answer_summary: "S".to_string(),
            answer_model: Some("Bonjour, réponse.".to_string()),
            latency_seconds: 1.5,
            keywords_proportion: 0.5,
            similarity_answer: 0.7,
            manual_pertinence: 2,
            manual_hallucination: false,
            exactitude_score: 0.6,
            pertinence_norm: 1.0,
            hallucinations_score: 1.0,
            latence_score: 0.4,
            complexite_score: 1.0,
            global_score: 0.79,
        };

        write_detailed_results(&path, &[record]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<EvaluationRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].manual_pertinence, 2);
        assert_eq!(rows[0].answer_model.as_deref(), Some("Bonjour, réponse."));
    }

    #[test]
    fn test_failed_answer_row_serializes_as_empty_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-only-eval.csv");

        let record = EvaluationRecord {
            question: "Q ?".to_string(),
            expected_answer_summary: "S".to_string(),
            answer_model: None,
            latency_seconds: 0.5,
            keywords_proportion: 0.0,
            similarity_answer: 0.0,
            manual_pertinence: 0,
            manual_hallucination: true,
            exactitude_score: 0.0,
            pertinence_norm: 0.0,
            hallucinations_score: 0.0,
            latence_score: 2.0 / 3.0,
            complexite_score: 1.0,
            global_score: 0.25,
        };

        write_detailed_results(&path, &[record]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().count() == 2);
    }
}
