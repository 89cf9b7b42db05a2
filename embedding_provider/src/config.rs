use std::time::Duration;

use crate::embedder::{DeterministicConfig, OpenAiConfig};

/// Default settings for the OpenAI embeddings endpoint.
#[derive(Debug, Clone, Copy)]
pub struct OpenAiDefaults {
    pub base_url: &'static str,
    pub embedding_model_id: &'static str,
    pub embedding_dimension: usize,
    pub timeout_secs: u64,
}

/// Shared defaults so CLI, web and tests can stay in sync.
pub const OPENAI_DEFAULTS: OpenAiDefaults = OpenAiDefaults {
    base_url: "https://api.openai.com/v1",
    embedding_model_id: "text-embedding-3-small",
    embedding_dimension: 1536,
    timeout_secs: 60,
};

/// Build an [`OpenAiConfig`] from the shared defaults and an API key.
pub fn default_openai_config(api_key: impl Into<String>) -> OpenAiConfig {
    OpenAiConfig {
        api_key: api_key.into(),
        base_url: OPENAI_DEFAULTS.base_url.into(),
        embedding_model_id: OPENAI_DEFAULTS.embedding_model_id.into(),
        dimension: OPENAI_DEFAULTS.embedding_dimension,
        timeout: Duration::from_secs(OPENAI_DEFAULTS.timeout_secs),
    }
}

/// Offline embedder config with the production dimension, for tests and dry runs.
pub fn default_deterministic_config() -> DeterministicConfig {
    DeterministicConfig {
        dimension: OPENAI_DEFAULTS.embedding_dimension,
        max_input_length: 32_768,
        embedding_model_id: "deterministic-hash".into(),
    }
}
