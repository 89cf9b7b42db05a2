pub mod reader_docx;
pub mod reader_txt;
pub mod classifier;
pub mod explanatory;
pub mod text_segmenter;
pub mod statute_chunker;
pub mod chunk_csv;

use chunk_model::Chunk;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use classifier::StatuteRules;
use statute_chunker::StatuteChunker;
use text_segmenter::TextChunkParams;

pub use chunk_csv::{read_chunks_csv, write_chunks_csv, CsvError};

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid docx {path}: {message}")]
    InvalidDocx { path: String, message: String },
}

/// File-level facts about one chunking run.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source_uri: String,
    pub reader_backend: &'static str,
    pub paragraph_count: usize,
    pub chunk_count: usize,
    pub extracted_at: String,
}

/// Result bundle including source metadata and chunk list.
#[derive(Debug, Clone)]
pub struct ChunkOutput {
    pub source: SourceInfo,
    pub chunks: Vec<Chunk>,
}

fn is_docx(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"))
}

/// Read the ordered paragraph stream of a statute file (`.docx`, otherwise plain text).
pub fn read_paragraphs(path: &str) -> Result<Vec<String>, ReaderError> {
    if is_docx(path) {
        reader_docx::read_docx_paragraphs(path)
    } else {
        reader_txt::read_txt_paragraphs(path)
    }
}

/// Chunk an in-memory paragraph stream with the statute rules.
pub fn chunk_paragraphs(paragraphs: &[String], params: &TextChunkParams) -> Vec<Chunk> {
    StatuteChunker::new(StatuteRules::default(), *params).chunk(paragraphs)
}

/// High-level entry: read a statute file and return its chunks.
pub fn chunk_statute_file(path: &str, params: &TextChunkParams) -> Result<ChunkOutput, ReaderError> {
    let paragraphs = read_paragraphs(path)?;
    let chunks = chunk_paragraphs(&paragraphs, params);
    info!(path, paragraphs = paragraphs.len(), chunks = chunks.len(), "chunked statute");
    Ok(ChunkOutput {
        source: SourceInfo {
            source_uri: path.to_string(),
            reader_backend: if is_docx(path) { "docx" } else { "txt" },
            paragraph_count: paragraphs.len(),
            chunk_count: chunks.len(),
            extracted_at: chrono::Utc::now().to_rfc3339(),
        },
        chunks,
    })
}
