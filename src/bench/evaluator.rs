//! Golden-set evaluation: automatic scoring, manual review and aggregation
//!
//! Stages run in a fixed order over one strategy's answer rows:
//! 1. automatic — keyword coverage and embedding similarity (one batch
//!    encode, answers paired diagonal-wise with their own summary);
//! 2. manual — a blocking console loop collecting pertinence (0/1/2) and a
//!    hallucination flag (x/v), re-prompting until both parse;
//! 3. aggregation — the weighted global score per row;
//! 4. summary — arithmetic means of every score column.

use std::io::BufRead;
use std::io::Write;
use std::sync::Arc;

use tracing::info;

use crate::embeddings::similarity::cosine_similarity;
use crate::embeddings::EmbeddingBackend;
use crate::errors::FaqRagError;
use crate::errors::Result;
use crate::models::EvaluationRecord;
use crate::models::StrategyAnswerRow;
use crate::models::StrategySummary;

/// Global-score weights. Fixed design constants; they must sum to 1.0.
pub const EXACTITUDE_WEIGHT: f64 = 0.30;
pub const PERTINENCE_WEIGHT: f64 = 0.20;
pub const HALLUCINATIONS_WEIGHT: f64 = 0.20;
pub const LATENCE_WEIGHT: f64 = 0.15;
pub const COMPLEXITE_WEIGHT: f64 = 0.15;

/// Evaluator for one strategy's answers against the golden set
pub struct GoldenSetEvaluator {
    embedding: Arc<dyn EmbeddingBackend>,
    complexite_score: f64,
}

impl GoldenSetEvaluator {
    /// `complexite_score` is a run-level placeholder constant, identical for
    /// every row of the run.
    pub fn new(embedding: Arc<dyn EmbeddingBackend>, complexite_score: f64) -> Self {
        Self {
            embedding,
            complexite_score,
        }
    }

    /// Proportion of expected keywords present in the answer as
    /// case-insensitive substrings; 0.0 when nothing is expected.
    pub fn keywords_proportion(answer: &str, expected_keywords: &[String]) -> f64 {
        if expected_keywords.is_empty() {
            return 0.0;
        }

        let answer_lower = answer.to_lowercase();
        let present = expected_keywords
            .iter()
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty() && answer_lower.contains(kw.as_str()))
            .count();

        present as f64 / expected_keywords.len() as f64
    }

    /// Batch-embed all answers and all expected summaries, then pair them
    /// diagonal-wise: answer[i] is compared only to summary[i].
    async fn similarity_scores(&self, rows: &[StrategyAnswerRow]) -> Result<Vec<f64>> {
        let answers: Vec<String> = rows
            .iter()
            .map(|r| r.answer_model.clone().unwrap_or_default().trim().to_string())
            .collect();
        let summaries: Vec<String> = rows
            .iter()
            .map(|r| r.expected_answer_summary.trim().to_string())
            .collect();

        let emb_answers = self.embedding.encode(&answers).await?;
        let emb_summaries = self.embedding.encode(&summaries).await?;

        Ok(emb_answers
            .iter()
            .zip(emb_summaries.iter())
            .map(|(a, s)| f64::from(cosine_similarity(a, s)))
            .collect())
    }

    /// Blocking manual review: for each row, prompt for `pertinence
    /// hallucination` in the form `0/1/2 x/v`, re-prompting until both
    /// fields parse. Reader and writer are injected so the loop stays
    /// testable; exhausted input is a validation error, never a silent
    /// default.
    pub fn collect_manual_scores<R: BufRead, W: Write>(
        rows: &[StrategyAnswerRow],
        input: &mut R,
        output: &mut W,
    ) -> Result<Vec<(u8, bool)>> {
        writeln!(output, "\n=== ÉVALUATION MANUELLE ===")?;
        writeln!(output, " - pertinence : 0, 1 ou 2")?;
        writeln!(output, " - hallucination : x (oui) ou v (non)\n")?;

        let mut scores = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            writeln!(output, "{}", "=".repeat(80))?;
            writeln!(output, "[{}] Question :\n{}\n", idx, row.question)?;
            writeln!(output, "Réponse attendue :")?;
            writeln!(output, "{}", row.expected_answer_summary)?;
            writeln!(output, "\nRéponse prédite :")?;
            writeln!(output, "{}", row.answer_model.as_deref().unwrap_or(""))?;
            writeln!(output, "{}", "-".repeat(80))?;

            loop {
                write!(output, "Note (format 0/1/2 x/v) : ")?;
                output.flush()?;

                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Err(FaqRagError::Validation(
                        "manual review input ended before all rows were scored".to_string(),
                    ));
                }

                if let Some(parsed) = parse_manual_score(&line) {
                    scores.push(parsed);
                    break;
                }

                writeln!(output, "Entrée invalide. Exemple attendu : '0 x' ou '2 v'.")?;
            }

            writeln!(output)?;
        }

        Ok(scores)
    }

    fn aggregate(
        &self,
        row: &StrategyAnswerRow,
        keywords_proportion: f64,
        similarity_answer: f64,
        manual_pertinence: u8,
        manual_hallucination: bool,
    ) -> EvaluationRecord {
        let exactitude_score = (keywords_proportion + similarity_answer) / 2.0;
        let pertinence_norm = f64::from(manual_pertinence) / 2.0;
        let hallucinations_score = 1.0 - f64::from(u8::from(manual_hallucination));
        let latence_score = if row.latency_seconds > 0.0 {
            1.0 / (1.0 + row.latency_seconds)
        } else {
            1.0
        };

        let global_score = exactitude_score * EXACTITUDE_WEIGHT
            + pertinence_norm * PERTINENCE_WEIGHT
            + hallucinations_score * HALLUCINATIONS_WEIGHT
            + latence_score * LATENCE_WEIGHT
            + self.complexite_score * COMPLEXITE_WEIGHT;

        EvaluationRecord {
            question: row.question.clone(),
            expected_answer_summary: row.expected_answer_summary.clone(),
            answer_model: row.answer_model.clone(),
            latency_seconds: row.latency_seconds,
            keywords_proportion,
            similarity_answer,
            manual_pertinence,
            manual_hallucination,
            exactitude_score,
            pertinence_norm,
            hallucinations_score,
            latence_score,
            complexite_score: self.complexite_score,
            global_score,
        }
    }

    /// Per-strategy means over one run's records
    pub fn summarize(method: &str, records: &[EvaluationRecord]) -> StrategySummary {
        let mean = |f: fn(&EvaluationRecord) -> f64| -> f64 {
            if records.is_empty() {
                0.0
            } else {
                records.iter().map(f).sum::<f64>() / records.len() as f64
            }
        };

        StrategySummary {
            method: method.to_string(),
            keywords_mean: mean(|r| r.keywords_proportion),
            similarity_mean: mean(|r| r.similarity_answer),
            exactitude_score: mean(|r| r.exactitude_score),
            pertinence_mean: mean(|r| f64::from(r.manual_pertinence)),
            hallucinations_rate: mean(|r| f64::from(u8::from(r.manual_hallucination))),
            latence_mean: mean(|r| r.latency_seconds),
            latence_score: mean(|r| r.latence_score),
            complexite_score: mean(|r| r.complexite_score),
            global_score: mean(|r| r.global_score),
        }
    }

    /// Run the full evaluation over one strategy's answer rows
    pub async fn evaluate<R: BufRead, W: Write>(
        &self,
        method: &str,
        rows: &[StrategyAnswerRow],
        input: &mut R,
        output: &mut W,
    ) -> Result<(Vec<EvaluationRecord>, StrategySummary)> {
        info!("Evaluating {} rows for strategy '{}'", rows.len(), method);

        let similarities = self.similarity_scores(rows).await?;
        let manual = Self::collect_manual_scores(rows, input, output)?;

        let records: Vec<EvaluationRecord> = rows
            .iter()
            .zip(similarities)
            .zip(manual)
            .map(|((row, similarity), (pertinence, hallucination))| {
                let answer = row.answer_model.as_deref().unwrap_or("");
                let keywords =
                    Self::keywords_proportion(answer, &row.expected_keywords);
                self.aggregate(row, keywords, similarity, pertinence, hallucination)
            })
            .collect();

        let summary = Self::summarize(method, &records);
        Ok((records, summary))
    }
}

/// Parse one manual-score line of the form `<0|1|2> <x|v>`
fn parse_manual_score(line: &str) -> Option<(u8, bool)> {
    let lower = line.trim().to_lowercase();
    let mut parts = lower.split_whitespace();
    let pertinence = parts.next()?;
    let hallucination = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let pertinence: u8 = pertinence.parse().ok().filter(|p| *p <= 2)?;
    let hallucination = match hallucination {
        "x" => true,
        "v" => false,
        _ => return None,
    };

    Some((pertinence, hallucination))
}
