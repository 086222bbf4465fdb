use anyhow::{anyhow, Result};
use arrow_array::{Float32Array, StringArray};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::DistanceType;
use tracing::{debug, instrument};

use scout_core::traits::VectorStore;
use scout_core::types::{Payload, SemanticHit};
use scout_core::Error;

use crate::store::LanceVectorStore;

impl LanceVectorStore {
	/// Cosine nearest neighbours of `query_vector`, best first, at most `k`.
	#[instrument(skip_all, fields(table = %self.table, k = k))]
	pub async fn search_vec(&self, query_vector: &[f32], k: usize) -> Result<Vec<SemanticHit>> {
		if query_vector.len() != self.dim {
			return Err(Error::DimensionMismatch { expected: self.dim, actual: query_vector.len() }.into());
		}
		if k == 0 { return Ok(Vec::new()); }
		let table = self.conn.open_table(&self.table).execute().await?;
		let mut stream = table
			.vector_search(query_vector.to_vec())?
			.distance_type(DistanceType::Cosine)
			.limit(k)
			.execute()
			.await?;
		let mut hits = Vec::new();
		while let Some(batch) = stream.try_next().await? {
			let ids = string_column(&batch, "id")?;
			let payloads = string_column(&batch, "payload")?;
			let distances = batch
				.column_by_name("_distance")
				.and_then(|c| c.as_any().downcast_ref::<Float32Array>())
				.ok_or_else(|| anyhow!("search result has no _distance column"))?;
			for i in 0..batch.num_rows() {
				let payload: Payload = serde_json::from_str(payloads.value(i))?;
				hits.push(SemanticHit { id: ids.value(i).to_string(), payload, similarity: 1.0 - distances.value(i) });
			}
		}
		// Batches are not guaranteed to arrive in distance order.
		hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
		hits.truncate(k);
		debug!(hits = hits.len(), "vector search");
		Ok(hits)
	}
}

fn string_column<'a>(batch: &'a arrow_array::RecordBatch, name: &str) -> Result<&'a StringArray> {
	batch
		.column_by_name(name)
		.and_then(|c| c.as_any().downcast_ref::<StringArray>())
		.ok_or_else(|| anyhow!("search result has no {name} column"))
}

#[async_trait]
impl VectorStore for LanceVectorStore {
	async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<SemanticHit>> {
		self.search_vec(query_vector, k).await
	}
}
