//! `scout`: ingest a founder corpus and run hybrid searches over it.
//!
//! ```bash
//! scout ingest --csv data/founders.csv
//! scout search "fintech founders in Bangalore" -k 3
//! scout search "climate" --json
//! ```
mod app;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scout_core::config::Config;

#[derive(Parser)]
#[command(name = "scout", version, about = "Hybrid lexical + semantic founder search")]
struct Cli {
    /// Enable debug logging (RUST_LOG wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed the corpus and rebuild the vector collection
    Ingest {
        /// Corpus CSV (default: corpus.csv_path)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Run one hybrid query
    Search {
        query: String,
        /// Number of results (default: search.default_top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Corpus CSV for the lexical index (default: corpus.csv_path)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let config = Config::load()?;
    let settings = config.settings()?;

    match cli.command {
        Commands::Ingest { csv } => {
            let written = app::ingest(&config, &settings, csv).await?;
            println!("Ingested {written} profiles into '{}'", settings.vector.table);
        }
        Commands::Search { query, top_k, csv, json } => {
            let searcher = app::searcher(&config, &settings, csv).await?;
            let response = searcher.search(&query, top_k).await?;
            let rendered = if json { output::format_json(&response) } else { output::format_human(&query, &response) };
            println!("{rendered}");
        }
    }
    Ok(())
}
