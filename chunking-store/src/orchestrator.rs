use std::path::Path;

use chunk_model::{IndexedRecord, RetrievedArticle};
use tracing::{debug, info};

use crate::hnsw_index::HnswIndex;
use crate::sqlite_repo::{SqliteRepo, StoredArticle};
use crate::{cosine_similarity, ArticleIndexWriter, ArticleSearcher, MetaFilter, StoreError};

/// A named article collection: SQLite rows plus an in-memory HNSW graph over their vectors.
///
/// Filtered queries score the SQL-filtered rows exactly; unfiltered queries go through HNSW.
pub struct ArticleCollection {
    repo: SqliteRepo,
    name: String,
    rows: Vec<StoredArticle>,
    hnsw: Option<HnswIndex>,
}

impl ArticleCollection {
    /// Open (or create) the collection `name` in the database at `path` and load its graph.
    pub fn open<P: AsRef<Path>>(path: P, name: &str) -> Result<Self, StoreError> {
        Self::from_repo(SqliteRepo::open(path)?, name)
    }

    pub fn open_in_memory(name: &str) -> Result<Self, StoreError> {
        Self::from_repo(SqliteRepo::open_in_memory()?, name)
    }

    fn from_repo(repo: SqliteRepo, name: &str) -> Result<Self, StoreError> {
        let mut this = Self { repo, name: name.to_string(), rows: Vec::new(), hnsw: None };
        this.reload()?;
        Ok(this)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vector dimension of the stored records, `None` while the collection is empty.
    pub fn dimension(&self) -> Option<usize> {
        self.hnsw.as_ref().map(HnswIndex::dimension)
    }

    /// Re-read rows from SQLite and rebuild the HNSW graph.
    fn reload(&mut self) -> Result<(), StoreError> {
        self.rows = self.repo.load_collection(&self.name)?;
        self.hnsw = self.rows.first().map(|first| {
            let dim = first.vector.len();
            HnswIndex::build(dim, self.rows.iter().map(|r| r.vector.as_slice()))
        });
        info!(collection = %self.name, records = self.rows.len(), "loaded article collection");
        Ok(())
    }

    fn check_dimension(&self, actual: usize) -> Result<(), StoreError> {
        match self.dimension() {
            Some(expected) if expected != actual => Err(StoreError::DimensionMismatch { expected, actual }),
            _ => Ok(()),
        }
    }
}

fn uniform_dimension(records: &[IndexedRecord]) -> Result<(), StoreError> {
    if let Some(first) = records.first() {
        let expected = first.embedding.len();
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != expected) {
            return Err(StoreError::DimensionMismatch { expected, actual: bad.embedding.len() });
        }
    }
    Ok(())
}

impl ArticleIndexWriter for ArticleCollection {
    fn recreate_collection(&mut self) -> Result<(), StoreError> {
        let removed = self.repo.delete_collection(&self.name)?;
        self.rows.clear();
        self.hnsw = None;
        info!(collection = %self.name, removed, "recreated collection");
        Ok(())
    }

    fn upsert_records(&mut self, records: &[IndexedRecord]) -> Result<(), StoreError> {
        uniform_dimension(records)?;
        if let Some(first) = records.first() {
            self.check_dimension(first.embedding.len())?;
        }
        self.repo.upsert_records(&self.name, records)?;
        self.reload()
    }

    fn replace_collection(&mut self, records: &[IndexedRecord]) -> Result<(), StoreError> {
        uniform_dimension(records)?;
        let written = self.repo.replace_collection(&self.name, records)?;
        info!(collection = %self.name, written, "replaced collection");
        self.reload()
    }
}

impl ArticleSearcher for ArticleCollection {
    fn query(&self, embedding: &[f32], k: usize, filter: Option<&MetaFilter>) -> Result<Vec<RetrievedArticle>, StoreError> {
        if k == 0 || self.rows.is_empty() {
            return Ok(Vec::new());
        }
        self.check_dimension(embedding.len())?;

        let out: Vec<RetrievedArticle> = match filter.filter(|f| !f.is_empty()) {
            Some(f) => {
                let mut scored: Vec<(f32, StoredArticle)> = self
                    .repo
                    .list_by_filter(&self.name, f)?
                    .into_iter()
                    .map(|row| (cosine_similarity(embedding, &row.vector), row))
                    .collect();
                // stable: ties keep insertion order
                scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
                scored
                    .into_iter()
                    .take(k)
                    .map(|(_, row)| RetrievedArticle::new(row.document, row.meta))
                    .collect()
            }
            None => {
                let Some(hnsw) = self.hnsw.as_ref() else { return Ok(Vec::new()) };
                hnsw.knn(embedding, k)
                    .into_iter()
                    .filter_map(|(label, _)| self.rows.get(label))
                    .map(|row| RetrievedArticle::new(row.document.clone(), row.meta.clone()))
                    .collect()
            }
        };
        debug!(collection = %self.name, k, filtered = filter.is_some(), hits = out.len(), "query");
        Ok(out)
    }
}

/// Summary of a destructive rebuild.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RebuildReport {
    pub records_written: usize,
    pub dimension: usize,
}

/// Replace the whole collection with `records` in one step.
pub fn rebuild_collection<W: ArticleIndexWriter + ?Sized>(
    writer: &mut W,
    records: &[IndexedRecord],
) -> Result<RebuildReport, StoreError> {
    writer.replace_collection(records)?;
    Ok(RebuildReport {
        records_written: records.len(),
        dimension: records.first().map(|r| r.embedding.len()).unwrap_or(0),
    })
}
