use std::path::PathBuf;

use embedding_provider::config::OPENAI_DEFAULTS;

/// Context sentence the web front end puts in front of every question.
pub const DEFAULT_QUESTION_PREFIX: &str = "Dalam konteks Undang-Undang Pelindungan Data Pribadi (UU PDP), ";

pub const DEFAULT_APOLOGY: &str = "Maaf, saya tidak menemukan jawaban berdasarkan dokumen ini.";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub collection: String,
    /// Results for the targeted query; the fallback asks for twice as many.
    pub top_k: usize,
    /// Every embedding written to the index must have exactly this many components.
    pub expected_dimension: usize,
    /// Max number of documents to embed per request.
    pub embed_batch_size: usize,
    pub generation_model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    /// Returned verbatim when retrieval finds nothing.
    pub apology: String,
    /// Prepended to questions before retrieval and synthesis, when set.
    pub question_prefix: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/uupdp.db"),
            collection: "uupdp_law".into(),
            top_k: 15,
            expected_dimension: OPENAI_DEFAULTS.embedding_dimension,
            embed_batch_size: 64,
            generation_model: "gpt-4o".into(),
            temperature: 0.2,
            max_tokens: 700,
            apology: DEFAULT_APOLOGY.into(),
            question_prefix: None,
        }
    }
}
