use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, EmbedderError, EmbedderInfo, ProviderKind};

/// Configuration for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model_id: String,
    /// Dimension the model is expected to return.
    pub dimension: usize,
    pub timeout: Duration,
}

/// Blocking embeddings client. Failures surface as errors; there are no retries.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    info: EmbedderInfo,
    client: Client,
    endpoint: String,
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiConfig) -> Result<Self, EmbedderError> {
        if config.api_key.trim().is_empty() {
            return Err(EmbedderError::InvalidConfiguration { message: "missing OpenAI API key".into() });
        }
        if config.embedding_model_id.trim().is_empty() {
            return Err(EmbedderError::InvalidConfiguration { message: "missing embedding model name".into() });
        }
        if config.dimension == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "dimension must be greater than zero".into(),
            });
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| EmbedderError::InvalidConfiguration {
                message: "invalid OpenAI API key".into(),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| provider_failure("build OpenAI HTTP client", err))?;
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        Ok(Self {
            info: EmbedderInfo {
                provider: ProviderKind::OpenAi,
                embedding_model_id: config.embedding_model_id,
                dimension: config.dimension,
            },
            client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| EmbedderError::ProviderFailure { message: "OpenAI returned no embedding".into() })
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequest { model: &self.info.embedding_model_id, input: texts };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|err| provider_failure("call OpenAI embeddings", err))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbedderError::ProviderFailure {
                message: format!("OpenAI embeddings request failed ({status}): {body}"),
            });
        }
        let mut parsed: EmbeddingResponse =
            resp.json().map_err(|err| provider_failure("parse OpenAI embedding response", err))?;
        parsed.data.sort_by_key(|entry| entry.index);
        if parsed.data.len() != texts.len() {
            return Err(EmbedderError::ProviderFailure {
                message: format!("OpenAI returned {} embeddings for {} inputs", parsed.data.len(), texts.len()),
            });
        }
        debug!(inputs = texts.len(), "embedded batch");
        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }

    fn info(&self) -> &EmbedderInfo {
        &self.info
    }
}

fn provider_failure(context: &str, err: reqwest::Error) -> EmbedderError {
    EmbedderError::ProviderFailure { message: format!("{context} failed: {err}") }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
