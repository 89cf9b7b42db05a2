use std::cmp::min;

use anyhow::{Context, Result};
use clap::Parser;
use embedding_provider::config::{default_deterministic_config, default_openai_config, OPENAI_DEFAULTS};
use embedding_provider::embedder::{DeterministicEmbedder, Embedder, OpenAiEmbedder};
use tracing_subscriber::EnvFilter;

/// Embed one text and print the vector's dimension and first values.
#[derive(Parser, Debug)]
#[command(name = "embed-cli")]
struct Args {
    /// Text to embed (joined with spaces)
    text: Vec<String>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, default_value = OPENAI_DEFAULTS.embedding_model_id)]
    model: String,
    /// Use the offline hash embedder instead of the API
    #[arg(long)]
    deterministic: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let text = args.text.join(" ").trim().to_owned();
    let input = if text.is_empty() { "sample text for embedding".to_string() } else { text };

    let embedder: Box<dyn Embedder> = if args.deterministic {
        Box::new(DeterministicEmbedder::new(default_deterministic_config())?)
    } else {
        let key = args.api_key.context("OPENAI_API_KEY is not set (or pass --deterministic)")?;
        let mut config = default_openai_config(key);
        config.embedding_model_id = args.model;
        Box::new(OpenAiEmbedder::new(config)?)
    };

    let info = embedder.info();
    println!("provider: {:?} model: {}", info.provider, info.embedding_model_id);
    let vector = embedder.embed(&input).context("embedding failed")?;

    println!("input: {input}");
    println!("vector length: {}", vector.len());

    let preview = &vector[..min(8, vector.len())];
    println!("first {} values: {preview:?}", preview.len());
    Ok(())
}
