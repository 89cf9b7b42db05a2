use chrono::{DateTime, Utc};
use chunk_model::{ArticleDocument, Chunk, IndexedRecord};
use chunking_store::{aggregate_chunks, rebuild_collection, ArticleIndexWriter};
use embedding_provider::embedder::Embedder;
use tracing::info;

use crate::ServiceError;

/// Progress events emitted during an index rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start { total_documents: usize },
    EmbedBatch { done: usize, total: usize, batch: usize },
    ReplaceCollection { total: usize },
    Finished { total: usize },
}

#[derive(Debug, Clone)]
pub struct IndexReport {
    pub chunks: usize,
    pub documents: usize,
    pub dimension: usize,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct Indexer {
    pub expected_dimension: usize,
    pub embed_batch_size: usize,
}

impl Indexer {
    /// Rebuild the collection from chunks: aggregate, embed every article, validate
    /// dimensions, then replace the collection in one step. Any failure before the
    /// replace leaves the previous collection untouched.
    pub fn rebuild(
        &self,
        embedder: &dyn Embedder,
        writer: &mut dyn ArticleIndexWriter,
        chunks: &[Chunk],
        mut progress: Option<&mut (dyn FnMut(ProgressEvent) + '_)>,
    ) -> Result<IndexReport, ServiceError> {
        let docs = aggregate_chunks(chunks);
        if let Some(cb) = progress.as_mut() { cb(ProgressEvent::Start { total_documents: docs.len() }); }

        let records = self.build_records(
            embedder,
            &docs,
            progress.as_mut().map(|cb| &mut **cb as &mut dyn FnMut(ProgressEvent)),
        )?;

        if let Some(cb) = progress.as_mut() { cb(ProgressEvent::ReplaceCollection { total: records.len() }); }
        let report = rebuild_collection(writer, &records)?;
        info!(documents = report.records_written, dimension = report.dimension, "index rebuilt");
        if let Some(cb) = progress.as_mut() { cb(ProgressEvent::Finished { total: records.len() }); }

        Ok(IndexReport {
            chunks: chunks.len(),
            documents: records.len(),
            dimension: self.expected_dimension,
            built_at: Utc::now(),
        })
    }

    /// Embed documents in batches and pair each vector with its id, text and metadata.
    pub fn build_records(
        &self,
        embedder: &dyn Embedder,
        docs: &[ArticleDocument],
        mut progress: Option<&mut (dyn FnMut(ProgressEvent) + '_)>,
    ) -> Result<Vec<IndexedRecord>, ServiceError> {
        let texts: Vec<String> = docs.iter().map(ArticleDocument::document_text).collect();
        let bsz = self.embed_batch_size.max(1);
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        let mut done = 0usize;
        for batch in texts.chunks(bsz) {
            let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
            let vecs = embedder.embed_batch(&refs)?;
            if vecs.len() != refs.len() {
                return Err(ServiceError::BatchSize { expected: refs.len(), actual: vecs.len() });
            }
            for v in &vecs {
                if v.len() != self.expected_dimension {
                    return Err(ServiceError::DimensionMismatch { expected: self.expected_dimension, actual: v.len() });
                }
            }
            vectors.extend(vecs);
            done += batch.len();
            if let Some(cb) = progress.as_mut() { cb(ProgressEvent::EmbedBatch { done, total: texts.len(), batch: batch.len() }); }
        }

        Ok(docs
            .iter()
            .zip(texts)
            .zip(vectors)
            .enumerate()
            .map(|(i, ((doc, document), embedding))| IndexedRecord {
                id: format!("doc_{i}"),
                document,
                embedding,
                meta: doc.metadata(),
            })
            .collect())
    }
}
