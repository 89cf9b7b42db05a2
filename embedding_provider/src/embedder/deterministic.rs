use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{Embedder, EmbedderError, EmbedderInfo, ProviderKind};

#[derive(Debug, Clone)]
pub struct DeterministicConfig {
    pub dimension: usize,
    pub max_input_length: usize,
    pub embedding_model_id: String,
}

/// Hash-based pseudo embedder: equal texts map to equal vectors, no network involved.
#[derive(Debug, Clone)]
pub struct DeterministicEmbedder {
    info: EmbedderInfo,
    max_input_length: usize,
    base_seed: u64,
}

impl DeterministicEmbedder {
    pub fn new(config: DeterministicConfig) -> Result<Self, EmbedderError> {
        if config.dimension == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "dimension must be greater than zero".into(),
            });
        }

        if config.max_input_length == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "max_input_length must be greater than zero".into(),
            });
        }

        let base_seed = compute_seed(ProviderKind::Deterministic, &config.embedding_model_id);
        Ok(Self {
            info: EmbedderInfo {
                provider: ProviderKind::Deterministic,
                embedding_model_id: config.embedding_model_id,
                dimension: config.dimension,
            },
            max_input_length: config.max_input_length,
            base_seed,
        })
    }

    fn validate_length(&self, text: &str) -> Result<(), EmbedderError> {
        let actual_length = text.chars().count();
        if actual_length > self.max_input_length {
            return Err(EmbedderError::InputTooLong {
                max_length: self.max_input_length,
                actual_length,
            });
        }
        Ok(())
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut output = Vec::with_capacity(self.info.dimension);
        for index in 0..self.info.dimension {
            let mut hasher = DefaultHasher::new();
            self.base_seed.hash(&mut hasher);
            index.hash(&mut hasher);
            text.hash(&mut hasher);
            output.push(normalize_hash(hasher.finish()));
        }
        output
    }
}

impl Embedder for DeterministicEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        self.validate_length(text)?;
        Ok(self.generate_embedding(text))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn info(&self) -> &EmbedderInfo {
        &self.info
    }
}

fn compute_seed(provider: ProviderKind, embedding_model_id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    provider.hash(&mut hasher);
    embedding_model_id.hash(&mut hasher);
    hasher.finish()
}

fn normalize_hash(value: u64) -> f32 {
    const SCALE: f64 = 2.0;
    let normalized = (value as f64) / (u64::MAX as f64);
    (normalized * SCALE - 1.0) as f32
}
