//! Hybrid ranking: normalises the lexical and semantic hit lists into
//! [`Candidate`](scout_core::types::Candidate)s, merges them with weighted
//! reciprocal rank fusion and serves queries through [`HybridSearcher`].
pub mod candidates;
pub mod fusion;
pub mod handle;
pub mod orchestrator;
pub mod unavailable;

pub use fusion::{fuse, FusionWeights};
pub use handle::SharedLexicalIndex;
pub use orchestrator::{HybridSearcher, SearchOptions, SearchOutcome, SearchResponse};
pub use unavailable::Unavailable;
