//! Data models for the FAQ corpus, golden set and evaluation records

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// One entry of the municipal FAQ knowledge base.
///
/// `id`, `question` and `answer` are required; everything else is optional
/// with an explicit default substituted at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "keywords_field")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "keywords_field")]
    pub tags: Vec<String>,
}

impl FaqEntry {
    /// Category with the empty-string default applied
    pub fn category_or_empty(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Keywords comma-joined for display and corpus construction
    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }
}

/// One hand-labeled question of the golden reference set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenQuestion {
    pub question: String,
    pub expected_answer_summary: String,
    #[serde(default, deserialize_with = "keywords_field")]
    pub expected_keywords: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Keywords arrive either as a JSON array or as a free-form comma string;
/// both normalize to a Vec.
fn keywords_field<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeywordsRepr {
        List(Vec<String>),
        Text(String),
    }

    match Option::<KeywordsRepr>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(KeywordsRepr::List(list)) => Ok(list),
        Some(KeywordsRepr::Text(text)) => Ok(text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()),
    }
}

/// Final outcome of one grounded answering call
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub confidence: f32,
    pub sources: Vec<String>,
    pub latency_ms: f64,
}

/// One benchmark row: a golden question answered by one strategy.
///
/// `answer` is None when the backend call for that row failed; the latency
/// still reflects the time spent up to the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyAnswerRow {
    pub question: String,
    pub expected_answer_summary: String,
    pub expected_keywords: Vec<String>,
    pub answer_model: Option<String>,
    pub latency_seconds: f64,
}

/// Fully scored evaluation row for one (strategy, question) pair.
///
/// Columns are added in a fixed sequence: automatic scores, manual scores,
/// then the derived aggregates. A record is never mutated after aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: String,
    pub expected_answer_summary: String,
    pub answer_model: Option<String>,
    pub latency_seconds: f64,
    pub keywords_proportion: f64,
    pub similarity_answer: f64,
    pub manual_pertinence: u8,
    pub manual_hallucination: bool,
    pub exactitude_score: f64,
    pub pertinence_norm: f64,
    pub hallucinations_score: f64,
    pub latence_score: f64,
    pub complexite_score: f64,
    pub global_score: f64,
}

/// Per-strategy means across one evaluation run; one ledger row per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub method: String,
    pub keywords_mean: f64,
    pub similarity_mean: f64,
    pub exactitude_score: f64,
    pub pertinence_mean: f64,
    pub hallucinations_rate: f64,
    pub latence_mean: f64,
    pub latence_score: f64,
    pub complexite_score: f64,
    pub global_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faq_entry_keywords_as_list() {
        let entry: FaqEntry = serde_json::from_str(
            r#"{"id": "1", "question": "Q", "answer": "A",
                "category": "État civil", "keywords": ["acte", "naissance"]}"#,
        )
        .unwrap();
        assert_eq!(entry.keywords, vec!["acte", "naissance"]);
        assert_eq!(entry.keywords_joined(), "acte, naissance");
    }

    #[test]
    fn test_faq_entry_keywords_as_string() {
        let entry: FaqEntry = serde_json::from_str(
            r#"{"id": "1", "question": "Q", "answer": "A", "keywords": "acte, naissance , "}"#,
        )
        .unwrap();
        assert_eq!(entry.keywords, vec!["acte", "naissance"]);
    }

    #[test]
    fn test_faq_entry_optional_fields_default() {
        let entry: FaqEntry =
            serde_json::from_str(r#"{"id": "1", "question": "Q", "answer": "A"}"#).unwrap();
        assert_eq!(entry.category_or_empty(), "");
        assert!(entry.keywords.is_empty());
        assert!(entry.theme.is_none());
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn test_golden_question_minimal() {
        let q: GoldenQuestion = serde_json::from_str(
            r#"{"question": "Q ?", "expected_answer_summary": "S"}"#,
        )
        .unwrap();
        assert!(q.expected_keywords.is_empty());
        assert!(q.difficulty.is_none());
    }
}
