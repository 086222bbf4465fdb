use std::env;
use std::path::PathBuf;

use scout_core::traits::Embedder;
use scout_embed::LocalEmbedder;

// Usage: cargo run -p scout-embed --example embed -- <model_dir>
fn main() -> anyhow::Result<()> {
    let model_dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("models/bge-m3"));
    let embedder = LocalEmbedder::load(&model_dir, 256)?;
    let texts = vec!["fintech founder in Bangalore".to_string(), "climate hardware startup".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={}", embs.len(), embedder.dim());
    Ok(())
}
