use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use scout_core::config::{expand_path, Config, Settings, UpstreamPolicy};
use scout_core::corpus::CorpusLoader;
use scout_core::traits::{Embedder, VectorStore};
use scout_core::types::Document;
use scout_hybrid::{HybridSearcher, SearchOptions, SharedLexicalIndex, Unavailable};
use scout_lexical::{Bm25Params, LexicalIndex};
use scout_vector::{ingest_documents, LanceVectorStore};

fn load_corpus(config: &Config, settings: &Settings, csv: Option<PathBuf>) -> Result<Vec<Document>> {
    let path = csv.unwrap_or_else(|| config.resolve_path(&settings.corpus.csv_path));
    CorpusLoader::new()
        .load(&path)
        .with_context(|| format!("loading corpus from {}", path.display()))
}

async fn open_store(config: &Config, settings: &Settings) -> Result<LanceVectorStore> {
    let uri = config.resolve_path(&settings.vector.uri);
    LanceVectorStore::open(&uri.to_string_lossy(), &settings.vector.table, settings.vector.dim).await
}

fn embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let model_dir = expand_path(&settings.embed.model_dir);
    scout_embed::from_settings(&settings.embed, &model_dir, settings.vector.dim)
}

pub async fn ingest(config: &Config, settings: &Settings, csv: Option<PathBuf>) -> Result<usize> {
    let documents = load_corpus(config, settings, csv)?;
    let store = open_store(config, settings).await?;
    let embedder = embedder(settings)?;
    ingest_documents(&store, embedder.as_ref(), &documents, settings.ingest.batch_size).await
}

/// Under the degrade policy a collaborator that fails to build is replaced by
/// [`Unavailable`], so queries still answer from the lexical index.
fn or_stand_in<T: ?Sized>(
    built: Result<Arc<T>>,
    what: &str,
    settings: &Settings,
    stand_in: impl FnOnce(Unavailable) -> Arc<T>,
) -> Result<Arc<T>> {
    match built {
        Ok(collaborator) => Ok(collaborator),
        Err(e) if settings.search.on_upstream_failure == UpstreamPolicy::Degrade => {
            let reason = format!("{what} unavailable: {e:#}");
            warn!(%reason, "starting without semantic search");
            Ok(stand_in(Unavailable::new(reason, settings.vector.dim)))
        }
        Err(e) => Err(e.context(format!("{what} unavailable"))),
    }
}

/// Builds the lexical index and wires both collaborators.
///
/// A corpus that cannot be loaded or indexed stops the process here.
pub async fn searcher(config: &Config, settings: &Settings, csv: Option<PathBuf>) -> Result<HybridSearcher> {
    let documents = load_corpus(config, settings, csv)?;
    let index = LexicalIndex::build(documents, Bm25Params::from(&settings.lexical)).context("building lexical index")?;
    info!(documents = index.len(), "lexical index ready");

    let store = open_store(config, settings).await.map(|s| Arc::new(s) as Arc<dyn VectorStore>);
    let store = or_stand_in(store, "vector store", settings, |u| Arc::new(u) as Arc<dyn VectorStore>)?;
    let embedder = or_stand_in(embedder(settings), "embedder", settings, |u| Arc::new(u) as Arc<dyn Embedder>)?;
    Ok(HybridSearcher::new(
        Arc::new(SharedLexicalIndex::new(index)),
        embedder,
        store,
        SearchOptions::from(&settings.search),
    ))
}
