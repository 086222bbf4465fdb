use anyhow::{Context, Result};
use lancedb::Connection;
use tracing::info;

use scout_core::Error;

use crate::schema::build_arrow_schema;
use crate::table::{ensure_table, open_db, table_exists};

/// One LanceDB table holding the document vectors of a collection.
pub struct LanceVectorStore {
    pub(crate) conn: Connection,
    pub(crate) table: String,
    pub(crate) dim: usize,
}

impl LanceVectorStore {
    pub async fn open(uri: &str, table: &str, dim: usize) -> Result<Self> {
        let conn = open_db(uri).await.with_context(|| format!("opening LanceDB at {uri}"))?;
        Ok(Self { conn, table: table.to_string(), dim })
    }

    pub fn table_name(&self) -> &str { &self.table }

    pub fn dim(&self) -> usize { self.dim }

    /// Leaves the collection empty with the configured vector width.
    ///
    /// An existing table whose vector width differs is rejected rather than dropped.
    pub async fn recreate(&self) -> Result<()> {
        let schema = build_arrow_schema(self.dim);
        ensure_table(&self.conn, &self.table, schema.clone()).await?;
        let t = self.conn.open_table(&self.table).execute().await?;
        let existing = t.schema().await?;
        let expected = schema.field_with_name("vector")?.data_type().clone();
        let actual = existing.field_with_name("vector").map(|f| f.data_type().clone()).ok();
        if actual.as_ref() != Some(&expected) {
            return Err(Error::InvalidConfig(format!(
                "table '{}' has vector type {:?}, expected {:?}; remove it or change vector.dim",
                self.table, actual, expected
            ))
            .into());
        }
        let _deleted = t.delete("true").await?;
        info!(table = %self.table, dim = self.dim, "collection reset");
        Ok(())
    }

    /// Number of stored rows, 0 when the table does not exist yet.
    pub async fn count(&self) -> Result<usize> {
        if !table_exists(&self.conn, &self.table).await? {
            return Ok(0);
        }
        let t = self.conn.open_table(&self.table).execute().await?;
        Ok(t.count_rows(None).await?)
    }
}
