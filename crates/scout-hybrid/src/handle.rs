use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use scout_core::types::Document;
use scout_core::Result;
use scout_lexical::{Bm25Params, LexicalIndex};

/// Shared, swappable reference to the current lexical index.
///
/// Readers take a snapshot `Arc` and keep using it for the whole query, so a
/// concurrent [`rebuild`](Self::rebuild) never exposes a partially built index.
pub struct SharedLexicalIndex {
    current: RwLock<Arc<LexicalIndex>>,
}

impl SharedLexicalIndex {
    pub fn new(index: LexicalIndex) -> Self {
        Self { current: RwLock::new(Arc::new(index)) }
    }

    pub fn snapshot(&self) -> Arc<LexicalIndex> {
        Arc::clone(&self.current.read())
    }

    /// Builds a replacement from `documents` and swaps it in.
    ///
    /// On failure the current index stays in place.
    pub fn rebuild(&self, documents: Vec<Document>, params: Bm25Params) -> Result<()> {
        let fresh = LexicalIndex::build(documents, params)?;
        let len = fresh.len();
        *self.current.write() = Arc::new(fresh);
        info!(documents = len, "lexical index swapped");
        Ok(())
    }
}
