use anyhow::Result;
use clap::{Parser, Subcommand};
use search_core::corpus::build_from_file;
use search_core::{QueryEngine, StandardTokenizer};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

mod extract;

use extract::{Extractor, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Extract a document tree into a corpus file and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every .html file under a directory into one corpus line
    Extract {
        /// Root of the local document tree
        #[arg(long)]
        input: String,
        /// Corpus file to write
        #[arg(long)]
        output: String,
        /// Published location that mirrors the input tree
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Build the index and print the postings of one term
    Inspect {
        #[arg(long)]
        corpus: String,
        #[arg(long)]
        term: String,
    },
    /// Build the index and print ranked hits for a query as JSON
    Query {
        #[arg(long)]
        corpus: String,
        #[arg(long)]
        q: String,
        /// Print at most this many hits
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output, base_url } => {
            let stats = Extractor::new(&input, &base_url).run(&output)?;
            tracing::info!(written = stats.written, failed = stats.failed, %output, "extraction complete");
            Ok(())
        }
        Commands::Inspect { corpus, term } => inspect(&corpus, &term),
        Commands::Query { corpus, q, limit } => query(&corpus, &q, limit),
    }
}

fn inspect(corpus: &str, term: &str) -> Result<()> {
    let (index, report) = build_from_file(corpus, &StandardTokenizer::new())?;
    for skipped in &report.skipped {
        eprintln!("skipped line {}: {}", skipped.line, skipped.error);
    }
    println!("index: {} documents, {} terms", index.num_docs(), index.num_terms());
    // index keys are lower-cased
    let term = term.to_lowercase();
    let postings = index.lookup_postings(&term);
    println!("{term}: {} postings", postings.len());
    for p in postings {
        let doc = index.lookup_document(p.doc_id)?;
        println!("{}\t{}\t{}", p.doc_id, p.weight, doc.title);
    }
    Ok(())
}

fn query(corpus: &str, q: &str, limit: Option<usize>) -> Result<()> {
    let tokenizer = StandardTokenizer::new();
    let (index, _) = build_from_file(corpus, &tokenizer)?;
    let engine = QueryEngine::new(Arc::new(index), tokenizer);
    let mut hits = engine.search(q)?;
    if let Some(n) = limit {
        hits.truncate(n);
    }
    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}
