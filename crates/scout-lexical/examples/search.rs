use std::env;
use std::path::PathBuf;

use scout_core::corpus::CorpusLoader;
use scout_lexical::{Bm25Params, LexicalIndex};

// Build the BM25 index from a CSV corpus and print the lexical top-k.
// Usage:
//   cargo run -p scout-lexical --example search -- "your query" [--csv data/founders.csv] [--limit 5]

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut query = String::new();
    let mut csv = PathBuf::from("data/founders.csv");
    let mut limit: usize = 5;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--csv" if i + 1 < args.len() => { csv = PathBuf::from(&args[i + 1]); i += 2; }
            "--limit" if i + 1 < args.len() => { limit = args[i + 1].parse().unwrap_or(limit); i += 2; }
            s if s.starts_with('-') => { eprintln!("Unknown or incomplete flag: {}", s); std::process::exit(2); }
            s => { if query.is_empty() { query = s.to_string(); } i += 1; }
        }
    }
    if query.is_empty() {
        eprintln!("Usage: cargo run -p scout-lexical --example search -- <query> [--csv FILE] [--limit N]");
        std::process::exit(1);
    }

    let documents = CorpusLoader::new().load(&csv)?;
    let index = LexicalIndex::build(documents, Bm25Params::default())?;
    println!("BM25 search over {} documents\nQuery: {} (limit {})\n", index.len(), query, limit);
    for (rank, hit) in index.top_k(&query, limit).iter().enumerate() {
        println!("{:>2}. score={:.3} id={}\n    {}", rank + 1, hit.score, hit.document.id, hit.document.chunk);
    }
    Ok(())
}
