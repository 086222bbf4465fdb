//! Loads the profile corpus from a headered CSV file.
//!
//! Each row becomes one [`Document`]: every column lands in the payload as a
//! string, empty cells become empty strings, rows without an `id` receive a
//! UUIDv5 derived from their cells, and the lexical/embedding `chunk` is
//! rendered from the profile columns.
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Document, Payload};

const ID_FIELD: &str = "id";

/// Namespace for ids derived from row content.
const ROW_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_8b3d_4c57_9e21_d4a0_5b7f_c913);

/// Id for a row that has none. Depends only on the row's cells, so every load
/// of the same file (ingest and search alike) yields the same id.
fn content_id(payload: &Payload) -> String {
    let mut key = String::new();
    for (name, value) in payload.iter().filter(|(name, _)| name.as_str() != ID_FIELD) {
        key.push_str(name);
        key.push('\u{1f}');
        key.push_str(value.as_str().unwrap_or(""));
        key.push('\u{1e}');
    }
    Uuid::new_v5(&ROW_NAMESPACE, key.as_bytes()).to_string()
}

/// Renders the display/index text of a profile row.
///
/// Missing fields render as empty strings so the shape of the sentence is stable.
pub fn build_chunk(fields: &Payload) -> String {
    let f = |name: &str| fields.get(name).and_then(Value::as_str).unwrap_or("");
    format!(
        "{}, {} at {}, {}. Idea: {}. Bio: {}. Keywords: {}.",
        f("founder_name"),
        f("role"),
        f("company"),
        f("location"),
        f("idea"),
        f("about"),
        f("keywords"),
    )
}

pub struct CorpusLoader {
    delimiter: u8,
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CorpusLoader {
    pub fn new() -> Self { Self::default() }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads the whole corpus. An unreadable or empty file is an error.
    pub fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let file = File::open(path)
            .map_err(|e| Error::Corpus(format!("cannot open {}: {}", path.display(), e)))?;
        let documents = self.read(file)?;
        if documents.is_empty() {
            return Err(Error::EmptyCorpus(path.display().to_string()));
        }
        info!(path = %path.display(), documents = documents.len(), "corpus loaded");
        Ok(documents)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<Document>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| Error::Corpus(format!("invalid header row: {e}")))?
            .clone();

        let mut documents = Vec::new();
        let mut seen = HashSet::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| Error::Corpus(format!("row {}: {}", row + 1, e)))?;
            let mut payload = Payload::new();
            for (i, name) in headers.iter().enumerate() {
                let value = record.get(i).unwrap_or("");
                payload.insert(name.to_string(), Value::String(value.to_string()));
            }
            let id = match payload.get(ID_FIELD).and_then(Value::as_str) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    let derived = content_id(&payload);
                    debug!(row = row + 1, id = %derived, "derived id from row content");
                    derived
                }
            };
            if !seen.insert(id.clone()) {
                return Err(Error::DuplicateId(id));
            }
            let chunk = build_chunk(&payload);
            documents.push(Document::new(id, chunk, payload));
        }
        Ok(documents)
    }
}
