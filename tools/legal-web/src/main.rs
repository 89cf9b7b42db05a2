mod app;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use embedding_provider::config::{default_deterministic_config, default_openai_config};
use embedding_provider::embedder::{DeterministicEmbedder, Embedder, OpenAiEmbedder};
use legal_service::config::DEFAULT_QUESTION_PREFIX;
use legal_service::{OpenAiGenerator, OpenAiGeneratorConfig, QaService, ServiceConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{router, templates, AppState};

/// Web front end for UU PDP question answering.
#[derive(Parser, Debug)]
#[command(name = "legal-web")]
struct Args {
    #[arg(long, env = "LEGAL_QA_BIND", default_value = "127.0.0.1:8000")]
    bind: String,
    #[arg(long, env = "LEGAL_QA_DB")]
    db: Option<PathBuf>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long)]
    model: Option<String>,
    /// Embed questions with the offline hash embedder
    #[arg(long)]
    deterministic: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    // Blocking HTTP clients are built and dropped outside the async runtime.
    let service = Arc::new(Mutex::new(build_service(&args)?));
    let state = AppState {
        service: Arc::clone(&service),
        templates: Arc::new(templates().context("invalid page template")?),
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(serve(&args.bind, state))?;
    drop(runtime);
    drop(service);
    Ok(())
}

fn build_service(args: &Args) -> Result<QaService> {
    let mut cfg = ServiceConfig { question_prefix: Some(DEFAULT_QUESTION_PREFIX.to_string()), ..ServiceConfig::default() };
    if let Some(db) = &args.db {
        cfg.db_path = db.clone();
    }
    if let Some(model) = &args.model {
        cfg.generation_model = model.clone();
    }

    let embedder: Box<dyn Embedder> = if args.deterministic {
        Box::new(DeterministicEmbedder::new(default_deterministic_config())?)
    } else {
        Box::new(OpenAiEmbedder::new(default_openai_config(args.api_key.clone()))?)
    };
    let generator = OpenAiGenerator::new(OpenAiGeneratorConfig::new(args.api_key.clone(), cfg.generation_model.clone()))?;
    let db = cfg.db_path.display().to_string();
    QaService::open(cfg, embedder, Box::new(generator)).with_context(|| format!("cannot open collection in {db}"))
}

async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await.with_context(|| format!("cannot bind {bind}"))?;
    info!("listening on http://{bind}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
