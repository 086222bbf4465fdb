use async_trait::async_trait;

use scout_core::traits::{Embedder, VectorStore};
use scout_core::types::SemanticHit;
use scout_core::Error;

/// Stands in for a collaborator that could not be built at startup.
///
/// Every call fails with [`Error::UpstreamUnavailable`], so each query goes
/// through the searcher's upstream-failure policy.
#[derive(Debug, Clone)]
pub struct Unavailable {
    reason: String,
    dim: usize,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>, dim: usize) -> Self {
        Self { reason: reason.into(), dim }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn error(&self) -> anyhow::Error {
        Error::UpstreamUnavailable(self.reason.clone()).into()
    }
}

impl Embedder for Unavailable {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Err(self.error())
    }
}

#[async_trait]
impl VectorStore for Unavailable {
    async fn search(&self, _query_vector: &[f32], _k: usize) -> anyhow::Result<Vec<SemanticHit>> {
        Err(self.error())
    }
}
