pub mod config;
pub mod generator;
pub mod indexer;
pub mod retriever;
pub mod sources;
pub mod synthesizer;

use chunk_model::{Answer, Chunk};
use chunking_store::{ArticleCollection, ArticleIndexWriter, ArticleSearcher, StoreError};
use embedding_provider::embedder::{Embedder, EmbedderError};
use file_chunker::text_segmenter::TextChunkParams;
use file_chunker::{CsvError, ReaderError};
use tracing::info;

pub use config::ServiceConfig;
pub use generator::{CompletionRequest, GenerationError, Generator, OpenAiGenerator, OpenAiGeneratorConfig};
pub use indexer::{IndexReport, Indexer, ProgressEvent};
pub use retriever::{Retrieval, RetrievalPath, Retriever};
pub use synthesizer::AnswerSynthesizer;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("embedder error: {0}")]
    Embed(#[from] EmbedderError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("reader error: {0}")]
    Reader(#[from] ReaderError),
    #[error("chunk file error: {0}")]
    Csv(#[from] CsvError),
    /// Configuration error: the embedding model does not produce the dimension the index expects.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("embedder returned {actual} vectors for {expected} inputs")]
    BatchSize { expected: usize, actual: usize },
}

/// Prefix a question with the configured context sentence.
pub fn augment_question(prefix: Option<&str>, question: &str) -> String {
    match prefix {
        Some(p) => format!("{p}{}", question.trim()),
        None => question.trim().to_string(),
    }
}

/// The question-answering core shared by the CLI and the web front end.
pub struct QaService {
    cfg: ServiceConfig,
    embedder: Box<dyn Embedder>,
    generator: Box<dyn Generator>,
    index: Box<dyn ArticleSearcher + Send>,
}

impl QaService {
    pub fn new(
        cfg: ServiceConfig,
        embedder: Box<dyn Embedder>,
        generator: Box<dyn Generator>,
        index: Box<dyn ArticleSearcher + Send>,
    ) -> Self {
        Self { cfg, embedder, generator, index }
    }

    /// Open the configured SQLite collection and wire it to the given backends.
    pub fn open(cfg: ServiceConfig, embedder: Box<dyn Embedder>, generator: Box<dyn Generator>) -> Result<Self, ServiceError> {
        let collection = ArticleCollection::open(&cfg.db_path, &cfg.collection)?;
        if collection.is_empty() {
            tracing::warn!(collection = %cfg.collection, "collection is empty; run ingest first");
        }
        Ok(Self::new(cfg, embedder, generator, Box::new(collection)))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.cfg
    }

    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.cfg.top_k)
    }

    pub fn synthesizer(&self) -> AnswerSynthesizer {
        AnswerSynthesizer {
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
            apology: self.cfg.apology.clone(),
        }
    }

    /// Retrieve, synthesize and format citations for one question.
    pub fn ask(&self, question: &str) -> Result<Answer, ServiceError> {
        let question = augment_question(self.cfg.question_prefix.as_deref(), question);
        let retrieval = self.retriever().retrieve(self.embedder.as_ref(), self.index.as_ref(), &question)?;
        let answer = self.synthesizer().synthesize(self.generator.as_ref(), &question, &retrieval.documents())?;
        let sources = sources::format_sources(retrieval.metadatas());
        info!(path = ?retrieval.path, sources = sources.len(), "answered question");
        Ok(Answer { answer, sources })
    }
}

/// Chunk a statute file and rebuild the index from it.
pub fn ingest_file(
    cfg: &ServiceConfig,
    embedder: &dyn Embedder,
    writer: &mut dyn ArticleIndexWriter,
    path: &str,
    progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> Result<IndexReport, ServiceError> {
    let out = file_chunker::chunk_statute_file(path, &TextChunkParams::default())?;
    ingest_chunks(cfg, embedder, writer, &out.chunks, progress)
}

/// Rebuild the index from chunks exported earlier with `write_chunks_csv`.
pub fn ingest_chunk_file(
    cfg: &ServiceConfig,
    embedder: &dyn Embedder,
    writer: &mut dyn ArticleIndexWriter,
    path: &str,
    progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> Result<IndexReport, ServiceError> {
    let chunks = file_chunker::read_chunks_csv(path)?;
    ingest_chunks(cfg, embedder, writer, &chunks, progress)
}

pub fn ingest_chunks(
    cfg: &ServiceConfig,
    embedder: &dyn Embedder,
    writer: &mut dyn ArticleIndexWriter,
    chunks: &[Chunk],
    progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> Result<IndexReport, ServiceError> {
    let indexer = Indexer { expected_dimension: cfg.expected_dimension, embed_batch_size: cfg.embed_batch_size };
    indexer.rebuild(embedder, writer, chunks, progress)
}
