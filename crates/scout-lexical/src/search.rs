use std::collections::HashMap;

use tracing::{debug, instrument};

use scout_core::types::Document;

use crate::index::LexicalIndex;
use crate::tokenize::tokenize;

/// A document with a positive BM25 score for some query.
#[derive(Debug, Clone, Copy)]
pub struct LexicalHit<'a> {
    pub document: &'a Document,
    pub score: f64,
}

impl LexicalIndex {
    /// BM25 score of every document, aligned with [`LexicalIndex::documents`].
    ///
    /// Repeated query terms contribute once per occurrence. Documents sharing
    /// no term with the query score 0.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let mut scores = vec![0.0; self.documents.len()];
        let k1 = self.params.k1;
        let b = self.params.b;
        for term in tokenize(query) {
            let Some(stats) = self.terms.get(term) else { continue };
            for p in &stats.postings {
                let tf = f64::from(p.tf);
                let len_norm = if self.avgdl > 0.0 {
                    self.doc_lens[p.doc] as f64 / self.avgdl
                } else {
                    1.0
                };
                let denom = tf + k1 * (1.0 - b + b * len_norm);
                scores[p.doc] += stats.idf * (tf * (k1 + 1.0) / denom);
            }
        }
        scores
    }

    /// BM25 score keyed by document id.
    pub fn score(&self, query: &str) -> HashMap<&str, f64> {
        self.documents
            .iter()
            .map(|d| d.id.as_str())
            .zip(self.scores(query))
            .collect()
    }

    /// Highest-scoring documents, best first, at most `k`.
    ///
    /// Documents scoring `<= 0` are never returned. Equal scores keep corpus order.
    #[instrument(skip(self), fields(documents = self.documents.len()))]
    pub fn top_k(&self, query: &str, k: usize) -> Vec<LexicalHit<'_>> {
        let mut ranked: Vec<(usize, f64)> = self
            .scores(query)
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        debug!(hits = ranked.len(), "lexical top-k");
        ranked
            .into_iter()
            .map(|(i, score)| LexicalHit { document: &self.documents[i], score })
            .collect()
    }
}
