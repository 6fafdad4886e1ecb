//! RAG (Retrieval-Augmented Generation) for transcript question answering.

mod chain;

pub use chain::AnswerChain;

use crate::vector_store::SearchResult;

/// Concatenate retrieved chunks into prompt context.
///
/// Chunks appear in retrieval-ranked order, separated by blank lines.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.document.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::Document;

    #[test]
    fn test_format_context_preserves_ranking_order() {
        let results = vec![
            SearchResult {
                document: Document::new("most relevant".to_string(), 3, vec![1.0]),
                score: 0.9,
            },
            SearchResult {
                document: Document::new("less relevant".to_string(), 0, vec![1.0]),
                score: 0.5,
            },
        ];

        let context = format_context(&results);
        assert_eq!(context, "most relevant\n\nless relevant");
    }

    #[test]
    fn test_format_context_empty() {
        assert_eq!(format_context(&[]), "");
    }
}
