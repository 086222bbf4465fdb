//! scout-lexical
//!
//! In-memory Okapi BM25 index over the corpus chunks. See `index` for the
//! build step and `search` for scoring and top-k selection; `examples/search.rs`
//! runs a query against a CSV corpus during development.
pub mod index;
pub mod search;
pub mod tokenize;

pub use index::{Bm25Params, LexicalIndex};
pub use search::LexicalHit;
