//! Corpus construction from FAQ entries
//!
//! The embedding index is built once from these exact strings, so the
//! template must stay byte-for-byte deterministic: any formatting drift
//! after index construction silently desynchronizes retrieval quality.

use crate::models::FaqEntry;

/// Render one FAQ entry as its searchable corpus document.
///
/// Missing category renders as an empty string, never a "None" literal.
pub fn build_document(entry: &FaqEntry) -> String {
    format!(
        "Question: {}\nRéponse: {}\nCatégorie: {}\nMots-clés: {}",
        entry.question,
        entry.answer,
        entry.category_or_empty(),
        entry.keywords_joined(),
    )
}

/// Build one corpus document per FAQ entry, preserving entry order
pub fn build_corpus(entries: &[FaqEntry]) -> Vec<String> {
    entries.iter().map(build_document).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, q: &str, a: &str, c: Option<&str>, kws: &[&str]) -> FaqEntry {
        FaqEntry {
            id: id.to_string(),
            question: q.to_string(),
            answer: a.to_string(),
            category: c.map(ToString::to_string),
            keywords: kws.iter().map(ToString::to_string).collect(),
            theme: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_document_template() {
        let doc = build_document(&entry(
            "1",
            "Comment obtenir un acte de naissance ?",
            "En mairie ou en ligne.",
            Some("État civil"),
            &["acte", "naissance"],
        ));
        assert_eq!(
            doc,
            "Question: Comment obtenir un acte de naissance ?\n\
             Réponse: En mairie ou en ligne.\n\
             Catégorie: État civil\n\
             Mots-clés: acte, naissance"
        );
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let doc = build_document(&entry("1", "Q", "A", None, &[]));
        assert!(doc.ends_with("Catégorie: \nMots-clés: "));
        assert!(!doc.contains("None"));
    }

    #[test]
    fn test_corpus_length_and_order() {
        let entries = vec![
            entry("a", "Q1", "A1", None, &[]),
            entry("b", "Q2", "A2", None, &[]),
            entry("c", "Q3", "A3", None, &[]),
        ];
        let corpus = build_corpus(&entries);
        assert_eq!(corpus.len(), entries.len());
        assert!(corpus[0].contains("Q1"));
        assert!(corpus[2].contains("Q3"));
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let entries = vec![entry("a", "Q1", "A1", Some("C"), &["k1", "k2"])];
        assert_eq!(build_corpus(&entries), build_corpus(&entries));
    }
}
