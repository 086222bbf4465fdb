use anyhow::Result;
use arrow_array::{FixedSizeListArray, RecordBatch, RecordBatchIterator, StringArray};
use std::sync::Arc;
use tracing::debug;

use scout_core::types::VectorRecord;
use scout_core::Error;

use crate::schema::build_arrow_schema;
use crate::store::LanceVectorStore;
use crate::table::ensure_table;

impl LanceVectorStore {
	/// Inserts new ids and overwrites existing ones. Returns the number of records written.
	pub async fn upsert(&self, records: &[VectorRecord]) -> Result<usize> {
		if records.is_empty() { return Ok(0); }
		for r in records {
			if r.vector.len() != self.dim {
				return Err(Error::DimensionMismatch { expected: self.dim, actual: r.vector.len() }.into());
			}
		}
		let schema = build_arrow_schema(self.dim);
		ensure_table(&self.conn, &self.table, schema.clone()).await?;
		let batch = self.records_to_batch(records)?;
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
		let t = self.conn.open_table(&self.table).execute().await?;
		let mut mi = t.merge_insert(&["id"]);
		mi.when_matched_update_all(None).when_not_matched_insert_all();
		let _ = mi.execute(reader).await?;
		debug!(table = %self.table, rows = records.len(), "upserted");
		Ok(records.len())
	}

	fn records_to_batch(&self, records: &[VectorRecord]) -> Result<RecordBatch> {
		let mut ids = Vec::with_capacity(records.len());
		let mut chunks = Vec::with_capacity(records.len());
		let mut payloads = Vec::with_capacity(records.len());
		let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(records.len());
		for r in records {
			ids.push(r.id.clone());
			chunks.push(r.payload.get("chunk").and_then(|v| v.as_str()).unwrap_or("").to_string());
			payloads.push(serde_json::to_string(&r.payload)?);
			vectors.push(Some(r.vector.iter().map(|&x| Some(x)).collect()));
		}
		let batch = RecordBatch::try_new(build_arrow_schema(self.dim), vec![
			Arc::new(StringArray::from(ids)),
			Arc::new(StringArray::from(chunks)),
			Arc::new(StringArray::from(payloads)),
			Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors.into_iter(), self.dim as i32)),
		])?;
		Ok(batch)
	}
}
