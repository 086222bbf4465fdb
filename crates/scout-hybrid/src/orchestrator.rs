use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use scout_core::config::{SearchSettings, UpstreamPolicy};
use scout_core::traits::{Embedder, VectorStore};
use scout_core::types::{Candidate, Document, FusedResult, Payload, SemanticHit};
use scout_core::{Error, Result};
use scout_lexical::Bm25Params;

use crate::candidates::{from_lexical, from_semantic};
use crate::fusion::{fuse, FusionWeights};
use crate::handle::SharedLexicalIndex;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub default_top_k: usize,
    pub semantic_timeout: Duration,
    pub policy: UpstreamPolicy,
    pub min_similarity: Option<f32>,
    pub weights: FusionWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchSettings::default())
    }
}

impl From<&SearchSettings> for SearchOptions {
    fn from(s: &SearchSettings) -> Self {
        Self {
            default_top_k: s.default_top_k,
            semantic_timeout: Duration::from_millis(s.semantic_timeout_ms),
            policy: s.on_upstream_failure,
            min_similarity: s.min_similarity,
            weights: FusionWeights::from(s),
        }
    }
}

/// Either a ranked list or the distinct "nothing relevant" outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ranked(Vec<FusedResult>),
    NoResults,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub outcome: SearchOutcome,
    /// Set when the semantic source failed and the answer is lexical-only.
    pub degraded: Option<String>,
}

impl SearchResponse {
    pub fn results(&self) -> &[FusedResult] {
        match &self.outcome {
            SearchOutcome::Ranked(results) => results,
            SearchOutcome::NoResults => &[],
        }
    }

    pub fn payloads(&self) -> Vec<&Payload> {
        self.results().iter().map(|r| &r.payload).collect()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, SearchOutcome::NoResults)
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Entry point: validates a query, runs both sources and fuses their ranks.
pub struct HybridSearcher {
    lexical: Arc<SharedLexicalIndex>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    options: SearchOptions,
}

impl HybridSearcher {
    pub fn new(
        lexical: Arc<SharedLexicalIndex>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        options: SearchOptions,
    ) -> Self {
        Self { lexical, embedder, store, options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn lexical(&self) -> &SharedLexicalIndex {
        &self.lexical
    }

    /// Replaces the lexical index. Queries already running keep the old one.
    pub fn rebuild_lexical(&self, documents: Vec<Document>, params: Bm25Params) -> Result<()> {
        self.lexical.rebuild(documents, params)
    }

    /// Runs one hybrid query.
    ///
    /// `top_k` bounds each source and the fused list; `None` uses the configured
    /// default. Validation errors are returned before either source is called.
    #[instrument(skip(self, top_k), fields(k = tracing::field::Empty))]
    pub async fn search(&self, text: &str, top_k: Option<usize>) -> Result<SearchResponse> {
        if text.trim().is_empty() {
            return Err(Error::InvalidQuery("query text must not be empty".to_string()));
        }
        let top_k = top_k.unwrap_or(self.options.default_top_k);
        if top_k == 0 {
            return Err(Error::InvalidQuery("top_k must be at least 1".to_string()));
        }
        tracing::Span::current().record("k", top_k);

        let started = Instant::now();
        let (semantic, lexical) = tokio::join!(self.semantic_candidates(text, top_k), async {
            self.lexical_candidates(text, top_k)
        });

        let (semantic, degraded) = match semantic {
            Ok(candidates) => (candidates, None),
            Err(e) if e.is_upstream() && self.options.policy == UpstreamPolicy::Degrade => {
                warn!(error = %e, "semantic search unavailable, answering from lexical index only");
                (Vec::new(), Some(e.to_string()))
            }
            Err(e) => return Err(e),
        };

        let fused = fuse(&semantic, &lexical, self.options.weights, top_k);
        info!(
            semantic = semantic.len(),
            lexical = lexical.len(),
            fused = fused.len(),
            degraded = degraded.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "hybrid search complete"
        );
        let outcome = if fused.is_empty() { SearchOutcome::NoResults } else { SearchOutcome::Ranked(fused) };
        Ok(SearchResponse { outcome, degraded })
    }

    fn lexical_candidates(&self, text: &str, top_k: usize) -> Vec<Candidate> {
        let index = self.lexical.snapshot();
        let hits = index.top_k(text, top_k);
        from_lexical(&hits, top_k)
    }

    async fn semantic_candidates(&self, text: &str, top_k: usize) -> Result<Vec<Candidate>> {
        let limit = self.options.semantic_timeout;
        let hits = tokio::time::timeout(limit, self.semantic_hits(text, top_k))
            .await
            .map_err(|_| Error::UpstreamTimeout(limit))??;
        debug!(hits = hits.len(), "semantic hits");
        Ok(from_semantic(hits, top_k, self.options.min_similarity))
    }

    async fn semantic_hits(&self, text: &str, top_k: usize) -> Result<Vec<SemanticHit>> {
        let embedder = Arc::clone(&self.embedder);
        let query = text.to_string();
        let vector = tokio::task::spawn_blocking(move || embedder.embed(&query))
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("embedding task failed: {e}")))?
            .map_err(|e| Error::UpstreamUnavailable(format!("embedding failed: {e:#}")))?;
        self.store
            .search(&vector, top_k)
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("vector search failed: {e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use scout_lexical::LexicalIndex;
    use serde_json::Value;

    use super::*;

    struct FixedEmbedder;

    impl Embedder for FixedEmbedder {
        fn dim(&self) -> usize {
            2
        }
        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn dim(&self) -> usize {
            2
        }
        fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            anyhow::bail!("connection refused")
        }
    }

    /// Returns a fixed ranked list and counts calls.
    #[derive(Default)]
    struct ScriptedStore {
        hits: Vec<(&'static str, f32)>,
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail: bool,
    }

    #[async_trait]
    impl VectorStore for ScriptedStore {
        async fn search(&self, _query_vector: &[f32], k: usize) -> anyhow::Result<Vec<SemanticHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                anyhow::bail!("table not found");
            }
            Ok(self
                .hits
                .iter()
                .take(k)
                .map(|(id, similarity)| {
                    let mut payload = Payload::new();
                    payload.insert("id".into(), Value::String(id.to_string()));
                    SemanticHit { id: id.to_string(), payload, similarity: *similarity }
                })
                .collect())
        }
    }

    fn corpus() -> Vec<Document> {
        [
            ("1", "fintech payments founder in Bangalore"),
            ("2", "health diagnostics founder"),
            ("3", "agritech sensors for farmers"),
            ("4", "robotics warehouse automation"),
            ("5", "climate carbon accounting"),
        ]
        .iter()
        .map(|(id, chunk)| Document::new(*id, *chunk, Payload::new()))
        .collect()
    }

    fn searcher(embedder: Arc<dyn Embedder>, store: Arc<ScriptedStore>, options: SearchOptions) -> HybridSearcher {
        let index = LexicalIndex::build(corpus(), Bm25Params::default()).unwrap();
        HybridSearcher::new(Arc::new(SharedLexicalIndex::new(index)), embedder, store, options)
    }

    fn ids(response: &SearchResponse) -> Vec<&str> {
        response.results().iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn fuses_both_sources() {
        let store = Arc::new(ScriptedStore { hits: vec![("3", 0.9), ("1", 0.8)], ..Default::default() });
        let s = searcher(Arc::new(FixedEmbedder), store, SearchOptions::default());

        let response = s.search("fintech", Some(5)).await.unwrap();
        // 1: 0.5 + 0.5, 3: 1.0; tie keeps semantic insertion order
        assert_eq!(ids(&response), vec!["3", "1"]);
        assert!(!response.is_degraded());
        assert_eq!(response.results()[1].combined_score, 1.0);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_source_runs() {
        let store = Arc::new(ScriptedStore::default());
        let s = searcher(Arc::new(FixedEmbedder), Arc::clone(&store), SearchOptions::default());

        for text in ["", "   \t"] {
            let err = s.search(text, Some(3)).await.unwrap_err();
            assert!(matches!(err, Error::InvalidQuery(_)));
        }
        assert!(matches!(s.search("fintech", Some(0)).await, Err(Error::InvalidQuery(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn default_top_k_applies_when_absent() {
        let hits = vec![("1", 0.9), ("2", 0.8), ("3", 0.7), ("4", 0.6), ("5", 0.5)];
        let store = Arc::new(ScriptedStore { hits, ..Default::default() });
        let options = SearchOptions { default_top_k: 2, ..Default::default() };
        let s = searcher(Arc::new(FixedEmbedder), store, options);

        let response = s.search("founder", None).await.unwrap();
        assert_eq!(ids(&response), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn no_overlap_anywhere_is_a_distinct_empty_outcome() {
        let s = searcher(Arc::new(FixedEmbedder), Arc::new(ScriptedStore::default()), SearchOptions::default());
        let response = s.search("blockchain", Some(5)).await.unwrap();
        assert_eq!(response.outcome, SearchOutcome::NoResults);
        assert!(response.is_empty());
        assert!(response.payloads().is_empty());
    }

    #[tokio::test]
    async fn embedder_failure_degrades_to_lexical() {
        let s = searcher(Arc::new(BrokenEmbedder), Arc::new(ScriptedStore::default()), SearchOptions::default());
        let response = s.search("fintech", Some(5)).await.unwrap();
        assert_eq!(ids(&response), vec!["1"]);
        assert!(response.degraded.as_deref().is_some_and(|m| m.contains("connection refused")));
    }

    #[tokio::test]
    async fn stand_in_collaborators_follow_the_policy() {
        let index = Arc::new(SharedLexicalIndex::new(LexicalIndex::build(corpus(), Bm25Params::default()).unwrap()));
        let stand_in = Arc::new(crate::Unavailable::new("model directory missing", 2));
        let degrade = HybridSearcher::new(Arc::clone(&index), stand_in.clone(), stand_in.clone(), SearchOptions::default());
        let response = degrade.search("fintech", Some(5)).await.unwrap();
        assert_eq!(ids(&response), vec!["1"]);
        assert!(response.degraded.as_deref().is_some_and(|m| m.contains("model directory missing")));

        let options = SearchOptions { policy: UpstreamPolicy::Fail, ..Default::default() };
        let fail = HybridSearcher::new(index, stand_in.clone(), stand_in, options);
        assert!(matches!(fail.search("fintech", Some(5)).await, Err(Error::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn store_failure_surfaces_under_fail_policy() {
        let store = Arc::new(ScriptedStore { fail: true, ..Default::default() });
        let options = SearchOptions { policy: UpstreamPolicy::Fail, ..Default::default() };
        let s = searcher(Arc::new(FixedEmbedder), store, options);
        let err = s.search("fintech", Some(5)).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(m) if m.contains("table not found")));
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let store = Arc::new(ScriptedStore {
            hits: vec![("2", 0.9)],
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let degrade = SearchOptions { semantic_timeout: Duration::from_millis(50), ..Default::default() };
        let s = searcher(Arc::new(FixedEmbedder), Arc::clone(&store), degrade.clone());
        let response = s.search("fintech", Some(5)).await.unwrap();
        assert_eq!(ids(&response), vec!["1"]);
        assert!(response.is_degraded());

        let fail = SearchOptions { policy: UpstreamPolicy::Fail, ..degrade };
        let s = searcher(Arc::new(FixedEmbedder), store, fail);
        assert!(matches!(s.search("fintech", Some(5)).await, Err(Error::UpstreamTimeout(_))));
    }

    #[tokio::test]
    async fn similarity_floor_filters_semantic_hits() {
        let store = Arc::new(ScriptedStore { hits: vec![("4", 0.2), ("5", 0.9)], ..Default::default() });
        let options = SearchOptions { min_similarity: Some(0.5), ..Default::default() };
        let s = searcher(Arc::new(FixedEmbedder), store, options);
        let response = s.search("blockchain", Some(5)).await.unwrap();
        assert_eq!(ids(&response), vec!["5"]);
    }

    #[tokio::test]
    async fn rebuild_swaps_the_lexical_source() {
        let s = searcher(Arc::new(FixedEmbedder), Arc::new(ScriptedStore::default()), SearchOptions::default());
        s.rebuild_lexical(
            vec![
                Document::new("9", "quantum sensing", Payload::new()),
                Document::new("8", "other", Payload::new()),
                Document::new("7", "more", Payload::new()),
            ],
            Bm25Params::default(),
        )
        .unwrap();
        let response = s.search("quantum", Some(5)).await.unwrap();
        assert_eq!(ids(&response), vec!["9"]);
        assert!(s.search("fintech", Some(5)).await.unwrap().is_empty());
    }
}
