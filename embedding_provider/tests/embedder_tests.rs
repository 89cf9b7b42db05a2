use std::time::Duration;

use embedding_provider::config::{default_deterministic_config, default_openai_config, OPENAI_DEFAULTS};
use embedding_provider::embedder::{
    embed_or_zero, DeterministicConfig, DeterministicEmbedder, Embedder, EmbedderError, EmbedderInfo, OpenAiConfig,
    OpenAiEmbedder, ProviderKind,
};

fn small_config(max_input_length: usize) -> DeterministicConfig {
    DeterministicConfig { dimension: 16, max_input_length, embedding_model_id: "test-hash".into() }
}

#[test]
fn deterministic_embedder_is_stable_and_has_configured_dimension() {
    let embedder = DeterministicEmbedder::new(default_deterministic_config()).expect("valid config");
    let sentence = "Setiap Orang berhak atas pelindungan Data Pribadi.";
    let a = embedder.embed(sentence).expect("first embedding");
    let b = embedder.embed(sentence).expect("second embedding");
    assert_eq!(a, b);
    assert_eq!(a.len(), OPENAI_DEFAULTS.embedding_dimension);
    assert!(a.iter().any(|c| c.abs() > 1e-3), "embedding should not be all zeros");
    assert_ne!(a, embedder.embed("teks lain").expect("other embedding"));

    let info = embedder.info();
    assert_eq!(info.provider, ProviderKind::Deterministic);
    assert_eq!(info.dimension, 1536);
}

#[test]
fn embed_batch_matches_individual_embeddings() {
    let embedder = DeterministicEmbedder::new(small_config(1024)).expect("valid config");
    let inputs = ["Pasal 1 - Pasal 1\ndefinisi", "Pasal 2 - Pasal 2\nruang lingkup"];
    let batch = embedder.embed_batch(&inputs).expect("batch");
    assert_eq!(batch.len(), inputs.len());
    for (input, v) in inputs.iter().zip(batch.iter()) {
        assert_eq!(&embedder.embed(input).expect("single"), v);
    }
}

#[test]
fn over_long_input_is_an_error() {
    let embedder = DeterministicEmbedder::new(small_config(8)).expect("valid config");
    match embedder.embed(&"data ".repeat(10)) {
        Err(EmbedderError::InputTooLong { max_length, actual_length }) => {
            assert_eq!(max_length, 8);
            assert_eq!(actual_length, 50);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

/// Fails every text containing "gagal".
struct FlakyEmbedder {
    info: EmbedderInfo,
}

impl Embedder for FlakyEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        if text.contains("gagal") {
            Err(EmbedderError::ProviderFailure { message: "rate limited".into() })
        } else {
            Ok(vec![1.0; self.info.dimension])
        }
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn info(&self) -> &EmbedderInfo {
        &self.info
    }
}

#[test]
fn embed_or_zero_substitutes_zero_vectors_and_counts_them() {
    let embedder = FlakyEmbedder {
        info: EmbedderInfo { provider: ProviderKind::Deterministic, embedding_model_id: "flaky".into(), dimension: 3 },
    };
    let out = embed_or_zero(&embedder, &["ok", "gagal", "ok lagi"]);
    assert_eq!(out.degraded, 1);
    assert_eq!(out.vectors, vec![vec![1.0; 3], vec![0.0; 3], vec![1.0; 3]]);
}

#[test]
fn openai_embedder_validates_configuration_and_handles_empty_batch() {
    let err = OpenAiEmbedder::new(default_openai_config("  ")).expect_err("blank key");
    assert!(matches!(err, EmbedderError::InvalidConfiguration { .. }));

    let config = OpenAiConfig {
        api_key: "sk-test".into(),
        base_url: "http://localhost:9000/v1/".into(),
        embedding_model_id: "mock-embed".into(),
        dimension: 12,
        timeout: Duration::from_secs(1),
    };
    let embedder = OpenAiEmbedder::new(config).expect("valid config");
    assert_eq!(embedder.endpoint(), "http://localhost:9000/v1/embeddings");
    assert_eq!(embedder.info().provider, ProviderKind::OpenAi);
    assert_eq!(embedder.info().dimension, 12);

    let empty: [&str; 0] = [];
    assert!(embedder.embed_batch(&empty).expect("empty batches are allowed").is_empty());
}
