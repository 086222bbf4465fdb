use async_trait::async_trait;

use crate::types::SemanticHit;

/// Turns text into fixed-length dense vectors of dimension `dim()`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}

/// Nearest-neighbour lookup over stored document vectors.
///
/// Implementations return at most `k` hits ordered by descending similarity.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn search(&self, query_vector: &[f32], k: usize) -> anyhow::Result<Vec<SemanticHit>>;
}
