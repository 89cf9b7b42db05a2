pub mod aggregator;
pub mod sqlite_repo;
pub mod hnsw_index;
pub mod orchestrator;

use std::collections::BTreeMap;

use chunk_model::{ArticleMeta, IndexedRecord, RetrievedArticle};

pub use aggregator::aggregate_chunks;
pub use orchestrator::{rebuild_collection, ArticleCollection, RebuildReport};

/// Conjunction of metadata equality constraints, e.g. `article_root == "Pasal 5"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFilter {
    pub equals: BTreeMap<String, String>,
}

impl MetaFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut equals = BTreeMap::new();
        equals.insert(key.into(), value.into());
        Self { equals }
    }

    pub fn and_eq(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }

    /// In-memory evaluation; unknown keys never match.
    pub fn matches(&self, meta: &ArticleMeta) -> bool {
        self.equals.iter().all(|(k, v)| meta.field(k) == Some(v.as_str()))
    }
}

/// Write side of an article collection. The collection is only ever rebuilt wholesale.
pub trait ArticleIndexWriter {
    /// Discard every record of the collection.
    fn recreate_collection(&mut self) -> Result<(), StoreError>;

    fn upsert_records(&mut self, records: &[IndexedRecord]) -> Result<(), StoreError>;

    /// Recreate and upsert as one unit. Stores that can do this atomically override it.
    fn replace_collection(&mut self, records: &[IndexedRecord]) -> Result<(), StoreError> {
        self.recreate_collection()?;
        self.upsert_records(records)
    }
}

/// Read side: nearest articles to a query vector, optionally restricted by metadata.
pub trait ArticleSearcher {
    fn query(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&MetaFilter>,
    ) -> Result<Vec<RetrievedArticle>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("vector dimension mismatch: collection has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Cosine similarity; zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_known_fields_only() {
        let meta = ArticleMeta { article_root: "Pasal 5".into(), ..ArticleMeta::default() };
        assert!(MetaFilter::eq(ArticleMeta::ARTICLE_ROOT, "Pasal 5").matches(&meta));
        assert!(!MetaFilter::eq(ArticleMeta::ARTICLE_ROOT, "Pasal 6").matches(&meta));
        assert!(!MetaFilter::eq("page", "1").matches(&meta));
        assert!(MetaFilter::default().matches(&meta));
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
