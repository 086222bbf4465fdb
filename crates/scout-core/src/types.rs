//! Domain types shared by the lexical index, the vector store and the fusion stage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type DocId = String;

/// Named fields of a corpus record, returned verbatim to callers.
pub type Payload = Map<String, Value>;

/// One corpus record.
///
/// - `id`: stable unique identifier, also present in `payload["id"]`
/// - `payload`: every field of the source row
/// - `chunk`: the concatenated text used for lexical matching and embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub payload: Payload,
    pub chunk: String,
}

impl Document {
    pub fn new(id: impl Into<DocId>, chunk: impl Into<String>, mut payload: Payload) -> Self {
        let id = id.into();
        let chunk = chunk.into();
        payload.insert("id".to_string(), Value::String(id.clone()));
        payload.insert("chunk".to_string(), Value::String(chunk.clone()));
        Self { id, payload, chunk }
    }
}

/// Indicates which search path produced a candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Semantic,
    Lexical,
}

/// A per-source hit before fusion.
///
/// `source_rank` is the 0-based position inside that source's own list.
/// `source_score` is kept for display only; fusion never compares it across sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: DocId,
    pub payload: Payload,
    pub source: SourceKind,
    pub source_rank: usize,
    pub source_score: f64,
}

/// A document after fusion, with its accumulated rank-weighted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: DocId,
    pub payload: Payload,
    pub combined_score: f64,
}

/// Raw output row of the semantic-search collaborator, best match first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticHit {
    pub id: DocId,
    pub payload: Payload,
    /// Cosine similarity, higher is better.
    pub similarity: f32,
}

/// A row written to the vector store during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: DocId,
    pub vector: Vec<f32>,
    pub payload: Payload,
}
