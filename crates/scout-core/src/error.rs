use std::time::Duration;

use thiserror::Error;

/// Failure taxonomy shared by the index, the orchestrator and the loaders.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected at the search boundary before any collaborator runs.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream timed out after {0:?}")]
    UpstreamTimeout(Duration),

    #[error("Corpus is empty: {0}")]
    EmptyCorpus(String),

    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl Error {
    /// True for failures of the embedding or vector-store collaborators.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_) | Self::UpstreamTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
