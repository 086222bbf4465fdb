use anyhow::{ensure, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument};

use scout_core::traits::Embedder;
use scout_core::types::{Document, VectorRecord};
use scout_core::Error;

use crate::store::LanceVectorStore;

/// Resets the collection, embeds every chunk in batches and upserts `(id, vector, payload)`.
///
/// Returns the number of records written.
#[instrument(skip_all, fields(table = %store.table_name(), documents = documents.len(), batch_size = batch_size))]
pub async fn ingest_documents(
	store: &LanceVectorStore,
	embedder: &dyn Embedder,
	documents: &[Document],
	batch_size: usize,
) -> Result<usize> {
	ensure!(batch_size > 0, "batch_size must be positive");
	if embedder.dim() != store.dim() {
		return Err(Error::DimensionMismatch { expected: store.dim(), actual: embedder.dim() }.into());
	}
	store.recreate().await?;
	if documents.is_empty() { info!("no documents to ingest"); return Ok(0); }

	let total_batches = documents.len().div_ceil(batch_size);
	let pb = ProgressBar::new(documents.len() as u64);
	pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} profiles ({percent}%) {msg}")?.progress_chars("#>-"));

	let mut written = 0usize;
	for (batch_no, batch) in documents.chunks(batch_size).enumerate() {
		pb.set_message(format!("batch {}/{}", batch_no + 1, total_batches));
		let texts: Vec<String> = batch.iter().map(|d| d.chunk.clone()).collect();
		let vectors = embedder.embed_batch(&texts)?;
		ensure!(vectors.len() == batch.len(), "embedder returned {} vectors for {} texts", vectors.len(), batch.len());
		let records: Vec<VectorRecord> = batch
			.iter()
			.zip(vectors)
			.map(|(d, vector)| VectorRecord { id: d.id.clone(), vector, payload: d.payload.clone() })
			.collect();
		written += store.upsert(&records).await?;
		pb.inc(batch.len() as u64);
	}
	pb.finish_with_message("ingestion complete");
	info!(written, "collection populated");
	Ok(written)
}
