//! Flat-file loaders for the FAQ corpus and the golden set
//!
//! The FAQ loader fails closed: a missing file, malformed JSON or any record
//! without an `id` yields an empty dataset rather than a partial load, so
//! downstream retrieval degrades to "no context" instead of serving a
//! half-built corpus.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::errors::FaqRagError;
use crate::errors::Result;
use crate::models::FaqEntry;
use crate::models::GoldenQuestion;

#[derive(Deserialize)]
struct FaqFile {
    faq: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct GoldenSetFile {
    golden_set: Vec<GoldenQuestion>,
}

/// Load the FAQ knowledge base from a JSON file of shape `{"faq": [...]}`.
///
/// Always returns a (possibly empty) vector, never an error.
pub fn load_faq_data<P: AsRef<Path>>(path: P) -> Vec<FaqEntry> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("FAQ file {} not readable: {}", path.display(), e);
            return Vec::new();
        }
    };

    let file: FaqFile = match serde_json::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            warn!("FAQ file {} is malformed: {}", path.display(), e);
            return Vec::new();
        }
    };

    // Fail-closed: one record without an id invalidates the whole load
    let mut entries = Vec::with_capacity(file.faq.len());
    for record in file.faq {
        if record.get("id").and_then(serde_json::Value::as_str).is_none() {
            warn!(
                "FAQ file {} contains a record without an 'id' field; discarding the dataset",
                path.display()
            );
            return Vec::new();
        }
        match serde_json::from_value::<FaqEntry>(record) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(
                    "FAQ file {} contains an invalid record ({}); discarding the dataset",
                    path.display(),
                    e
                );
                return Vec::new();
            }
        }
    }

    entries
}

/// Load the golden set from a JSON file of shape `{"golden_set": [...]}`.
///
/// Unlike the FAQ loader this is a hard error: the benchmark cannot run
/// without its reference fixture.
pub fn load_golden_set<P: AsRef<Path>>(path: P) -> Result<Vec<GoldenQuestion>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        FaqRagError::DataLoad(format!("golden set {} not readable: {e}", path.display()))
    })?;

    let file: GoldenSetFile = serde_json::from_str(&content).map_err(|e| {
        FaqRagError::DataLoad(format!("golden set {} is malformed: {e}", path.display()))
    })?;

    if file.golden_set.is_empty() {
        return Err(FaqRagError::DataLoad(format!(
            "golden set {} is empty",
            path.display()
        )));
    }

    Ok(file.golden_set)
}
