mod deterministic;
mod openai;

use thiserror::Error;
use tracing::warn;

pub use deterministic::{DeterministicConfig, DeterministicEmbedder};
pub use openai::{OpenAiConfig, OpenAiEmbedder};

/// Identifies the backing implementation that powers an embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Deterministic,
}

/// Static metadata describing a particular embedder instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedderInfo {
    pub provider: ProviderKind,
    pub embedding_model_id: String,
    pub dimension: usize,
}

/// Errors that can be produced by embedder operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedderError {
    #[error("invalid embedder configuration: {message}")]
    InvalidConfiguration { message: String },
    #[error("input text exceeds max length of {max_length} characters, actual length: {actual_length}")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },
    #[error("provider failure: {message}")]
    ProviderFailure { message: String },
}

/// Core interface for all embedder implementations.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError>;
    fn info(&self) -> &EmbedderInfo;
}

/// Vectors from [`embed_or_zero`] plus how many of them are zero-filled stand-ins.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedEmbeddings {
    pub vectors: Vec<Vec<f32>>,
    pub degraded: usize,
}

/// Embed texts one at a time, substituting a zero vector for every failed call.
///
/// Only for bulk export tooling. Index builds must use [`Embedder::embed_batch`] and fail
/// on the first error.
pub fn embed_or_zero<E: Embedder + ?Sized>(embedder: &E, texts: &[&str]) -> DegradedEmbeddings {
    let dim = embedder.info().dimension;
    let mut vectors = Vec::with_capacity(texts.len());
    let mut degraded = 0usize;
    for (row, text) in texts.iter().enumerate() {
        match embedder.embed(text) {
            Ok(v) => vectors.push(v),
            Err(err) => {
                warn!(row, error = %err, "embedding failed; substituting zero vector");
                degraded += 1;
                vectors.push(vec![0.0; dim]);
            }
        }
    }
    DegradedEmbeddings { vectors, degraded }
}
