//! LanceDB-backed vector store and the ingestion pipeline that fills it.
//!
//! One table per collection with columns `id`, `chunk`, `payload` (JSON text)
//! and a fixed-size `vector`. Searches use cosine distance; similarity is
//! reported as `1 - distance`.
pub mod ingest;
pub mod schema;
pub mod search;
pub mod store;
pub mod table;
pub mod writer;

pub use ingest::ingest_documents;
pub use store::LanceVectorStore;
