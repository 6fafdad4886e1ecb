//! In-memory vector store implementation.
//!
//! One instance holds the index for exactly one transcript; a new ingestion
//! builds a fresh store rather than mutating an existing one.

use super::{cosine_similarity, Document, SearchResult, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory vector store with exhaustive similarity scan.
pub struct MemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().unwrap();
        store.extend(docs.iter().cloned());
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().unwrap();

        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|doc| SearchResult {
                score: cosine_similarity(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn document_count(&self) -> Result<usize> {
        let docs = self.documents.read().unwrap();
        Ok(docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store_search_ranking() {
        let store = MemoryVectorStore::new();

        let docs = vec![
            Document::new("Hello world".to_string(), 0, vec![1.0, 0.0, 0.0]),
            Document::new("Goodbye world".to_string(), 1, vec![0.0, 1.0, 0.0]),
            Document::new("Hello again".to_string(), 2, vec![0.9, 0.1, 0.0]),
        ];

        store.upsert_batch(&docs).await.unwrap();
        assert_eq!(store.document_count().await.unwrap(), 3);

        let results = store.search(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.content, "Hello world");
        assert_eq!(results[1].document.content, "Hello again");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_search_limit_larger_than_store() {
        let store = MemoryVectorStore::new();
        store
            .upsert_batch(&[Document::new("only one".to_string(), 0, vec![1.0, 0.0])])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 4).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_store_returns_no_results() {
        let store = MemoryVectorStore::new();
        let results = store.search(&[1.0, 0.0], 4).await.unwrap();
        assert!(results.is_empty());
    }
}
