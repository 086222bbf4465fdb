//! Embedding collaborators.
//!
//! `LocalEmbedder` runs BGE-M3 with candle; `HashedEmbedder` projects token
//! hashes into the same space without any model files and is what tests and
//! offline development use. Both return L2-normalised vectors.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use scout_core::config::{EmbedProviderKind, EmbedSettings};
use scout_core::traits::Embedder;
use scout_core::Error;

pub mod device;
pub mod hashed;
pub mod local;
pub mod pool;
pub mod tokenize;

pub use hashed::HashedEmbedder;
pub use local::LocalEmbedder;
pub use pool::masked_mean_l2;

/// Builds the configured embedder and checks it produces `dim`-sized vectors.
pub fn from_settings(settings: &EmbedSettings, model_dir: &Path, dim: usize) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match settings.provider {
        EmbedProviderKind::Hashed => Arc::new(HashedEmbedder::new(dim)),
        EmbedProviderKind::Local => Arc::new(LocalEmbedder::load(model_dir, settings.max_len)?),
    };
    if embedder.dim() != dim {
        return Err(Error::DimensionMismatch { expected: dim, actual: embedder.dim() }.into());
    }
    tracing::info!(provider = ?settings.provider, dim, "embedder ready");
    Ok(embedder)
}
