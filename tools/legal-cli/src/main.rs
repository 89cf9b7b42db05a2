use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chunk_model::Chunk;
use chunking_store::ArticleCollection;
use clap::{Parser, Subcommand};
use embedding_provider::config::{default_deterministic_config, default_openai_config};
use embedding_provider::embedder::{embed_or_zero, DeterministicEmbedder, Embedder, OpenAiEmbedder};
use file_chunker::text_segmenter::TextChunkParams;
use legal_service::sources::render_sources;
use legal_service::{
    ingest_chunk_file, ingest_file, IndexReport, OpenAiGenerator, OpenAiGeneratorConfig, ProgressEvent, QaService,
    ServiceConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Question answering over the UU PDP statute.
#[derive(Parser, Debug)]
#[command(name = "legal-cli")]
struct Cli {
    /// SQLite file holding the article collection
    #[arg(long, env = "LEGAL_QA_DB", global = true)]
    db: Option<PathBuf>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,
    /// Chat model used for answers
    #[arg(long, global = true)]
    model: Option<String>,
    /// Embed with the offline hash embedder instead of the API
    #[arg(long, global = true)]
    deterministic: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a statute (.docx or .txt) into chunks and write them as CSV
    Chunk {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
    },
    /// Embed every chunk row of a chunk CSV into a JSONL file
    Embed {
        #[arg(long)]
        chunks: String,
        #[arg(long)]
        output: String,
    },
    /// Rebuild the article collection
    Ingest {
        #[arg(long, required_unless_present = "chunks", conflicts_with = "chunks")]
        input: Option<String>,
        #[arg(long)]
        chunks: Option<String>,
    },
    /// Answer one question
    Ask { question: Vec<String> },
    /// Interactive session; type `exit` to quit
    Chat,
}

#[derive(Serialize)]
struct EmbeddingLine<'a> {
    #[serde(flatten)]
    chunk: &'a Chunk,
    embedding: &'a [f32],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = service_config(&cli);

    match &cli.command {
        Command::Chunk { input, output } => {
            let out = file_chunker::chunk_statute_file(input, &TextChunkParams::default())
                .with_context(|| format!("failed to chunk {input}"))?;
            file_chunker::write_chunks_csv(output, &out.chunks)?;
            println!(
                "{} paragraphs -> {} chunks ({}), written to {output}",
                out.source.paragraph_count, out.source.chunk_count, out.source.reader_backend
            );
        }
        Command::Embed { chunks, output } => {
            let embedder = make_embedder(&cli)?;
            let rows = file_chunker::read_chunks_csv(chunks)?;
            let texts: Vec<&str> = rows.iter().map(|c| c.text.as_str()).collect();
            let result = embed_or_zero(embedder.as_ref(), &texts);

            let mut w = BufWriter::new(File::create(output).with_context(|| format!("cannot create {output}"))?);
            write_embedding_lines(&mut w, &rows, &result.vectors)?;
            w.flush()?;
            println!("{} chunks embedded ({} degraded), written to {output}", rows.len(), result.degraded);
        }
        Command::Ingest { input, chunks } => {
            let embedder = make_embedder(&cli)?;
            let mut collection = ArticleCollection::open(&cfg.db_path, &cfg.collection)
                .with_context(|| format!("cannot open {}", cfg.db_path.display()))?;
            let mut print = |e: ProgressEvent| print_progress(&e);
            let report: IndexReport = match (input, chunks) {
                (Some(path), _) => ingest_file(&cfg, embedder.as_ref(), &mut collection, path, Some(&mut print))?,
                (None, Some(path)) => ingest_chunk_file(&cfg, embedder.as_ref(), &mut collection, path, Some(&mut print))?,
                (None, None) => bail!("pass --input or --chunks"),
            };
            println!(
                "{} chunks -> {} articles (dim {}) in '{}' at {}",
                report.chunks,
                report.documents,
                report.dimension,
                cfg.collection,
                report.built_at.to_rfc3339()
            );
        }
        Command::Ask { question } => {
            let question = question.join(" ");
            if question.trim().is_empty() {
                bail!("question is empty");
            }
            let service = open_service(&cli, cfg)?;
            print_answer(&service, &question)?;
        }
        Command::Chat => {
            let service = open_service(&cli, cfg)?;
            let stdin = io::stdin();
            loop {
                print!("\nPertanyaan (ketik 'exit' untuk keluar): ");
                io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let q = line.trim();
                if q.eq_ignore_ascii_case("exit") {
                    break;
                }
                if q.is_empty() {
                    continue;
                }
                if let Err(err) = print_answer(&service, q) {
                    eprintln!("error: {err:#}");
                }
            }
        }
    }
    Ok(())
}

/// One JSON object per chunk row: the chunk fields plus its vector.
fn write_embedding_lines<W: Write>(w: &mut W, rows: &[Chunk], vectors: &[Vec<f32>]) -> Result<()> {
    for (chunk, vector) in rows.iter().zip(vectors) {
        serde_json::to_writer(&mut *w, &EmbeddingLine { chunk, embedding: vector })?;
        writeln!(w)?;
    }
    Ok(())
}

fn service_config(cli: &Cli) -> ServiceConfig {
    let mut cfg = ServiceConfig::default();
    if let Some(db) = &cli.db {
        cfg.db_path = db.clone();
    }
    if let Some(model) = &cli.model {
        cfg.generation_model = model.clone();
    }
    cfg
}

fn make_embedder(cli: &Cli) -> Result<Box<dyn Embedder>> {
    if cli.deterministic {
        return Ok(Box::new(DeterministicEmbedder::new(default_deterministic_config())?));
    }
    let key = cli.api_key.clone().context("OPENAI_API_KEY is not set (or pass --deterministic)")?;
    Ok(Box::new(OpenAiEmbedder::new(default_openai_config(key))?))
}

fn open_service(cli: &Cli, cfg: ServiceConfig) -> Result<QaService> {
    let embedder = make_embedder(cli)?;
    let key = cli.api_key.clone().context("OPENAI_API_KEY is required to generate answers")?;
    let generator = OpenAiGenerator::new(OpenAiGeneratorConfig::new(key, cfg.generation_model.clone()))?;
    Ok(QaService::open(cfg, embedder, Box::new(generator))?)
}

fn print_answer(service: &QaService, question: &str) -> Result<()> {
    let answer = service.ask(question)?;
    println!("\nJawaban:\n{}", answer.answer);
    if !answer.sources.is_empty() {
        println!("\n(Sumber terkait)");
        print!("{}", render_sources(&answer.sources));
    }
    Ok(())
}

fn print_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::Start { total_documents } => println!("embedding {total_documents} articles"),
        ProgressEvent::EmbedBatch { done, total, .. } => println!("  embedded {done}/{total}"),
        ProgressEvent::ReplaceCollection { total } => println!("writing {total} records"),
        ProgressEvent::Finished { total } => println!("done: {total} records"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedding_provider::embedder::DeterministicConfig;

    #[test]
    fn embed_output_has_one_line_per_chunk_row() {
        let embedder = DeterministicEmbedder::new(DeterministicConfig {
            dimension: 4,
            max_input_length: 1000,
            embedding_model_id: "hash".into(),
        })
        .expect("config");
        let rows = vec![
            Chunk::new("BAB I", "Pasal 2 (Part 1)", "bagian satu", ""),
            Chunk::new("BAB I", "Pasal 2 (Part 2)", "bagian dua", "Cukup jelas."),
        ];
        let texts: Vec<&str> = rows.iter().map(|c| c.text.as_str()).collect();
        let result = embed_or_zero(&embedder, &texts);

        let mut out = Vec::new();
        write_embedding_lines(&mut out, &rows, &result.vectors).expect("write");
        let text = String::from_utf8(out).expect("utf-8");
        let lines: Vec<serde_json::Value> =
            text.lines().map(|l| serde_json::from_str(l).expect("json line")).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["article_label"], "Pasal 2 (Part 2)");
        assert_eq!(lines[1]["text"], "bagian dua");
        assert_eq!(lines[1]["explanatory_note"], "Cukup jelas.");
        assert_eq!(lines[0]["embedding"].as_array().map(Vec::len), Some(4));
    }
}
