use std::collections::{HashMap, HashSet};

use tracing::{info, instrument};

use scout_core::config::LexicalSettings;
use scout_core::types::Document;
use scout_core::{Error, Result};

use crate::tokenize::tokenize;

/// Okapi BM25 constants, fixed for the lifetime of an index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalisation strength.
    pub b: f64,
    /// Negative IDFs are replaced by `epsilon * mean_idf`.
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, epsilon: 0.25 }
    }
}

impl From<&LexicalSettings> for Bm25Params {
    fn from(s: &LexicalSettings) -> Self {
        Self { k1: s.k1, b: s.b, epsilon: s.epsilon }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Posting {
    pub(crate) doc: usize,
    pub(crate) tf: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct TermStats {
    pub(crate) idf: f64,
    pub(crate) postings: Vec<Posting>,
}

/// Read-only BM25 index. One entry per corpus document, in corpus order.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    pub(crate) documents: Vec<Document>,
    pub(crate) doc_lens: Vec<usize>,
    pub(crate) avgdl: f64,
    pub(crate) terms: HashMap<String, TermStats>,
    pub(crate) params: Bm25Params,
}

impl LexicalIndex {
    /// Tokenizes every chunk and computes per-term document frequencies and IDFs.
    ///
    /// An empty corpus or a repeated document id fails the build.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn build(documents: Vec<Document>, params: Bm25Params) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus("no documents to index".to_string()));
        }
        let mut seen = HashSet::with_capacity(documents.len());
        for d in &documents {
            if !seen.insert(d.id.as_str()) {
                return Err(Error::DuplicateId(d.id.clone()));
            }
        }

        let mut doc_lens = Vec::with_capacity(documents.len());
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        for (doc, d) in documents.iter().enumerate() {
            let mut freqs: HashMap<&str, u32> = HashMap::new();
            let mut len = 0usize;
            for token in tokenize(&d.chunk) {
                *freqs.entry(token).or_insert(0) += 1;
                len += 1;
            }
            doc_lens.push(len);
            for (term, tf) in freqs {
                postings.entry(term.to_string()).or_default().push(Posting { doc, tf });
            }
        }
        // HashMap iteration above scrambles posting order; keep it by document.
        for list in postings.values_mut() {
            list.sort_by_key(|p| p.doc);
        }

        let n = documents.len() as f64;
        let avgdl = doc_lens.iter().sum::<usize>() as f64 / n;

        let mut idf_sum = 0.0;
        let mut terms: HashMap<String, TermStats> = postings
            .into_iter()
            .map(|(term, postings)| {
                let df = postings.len() as f64;
                let idf = (n - df + 0.5).ln() - (df + 0.5).ln();
                idf_sum += idf;
                (term, TermStats { idf, postings })
            })
            .collect();
        if !terms.is_empty() {
            let floor = params.epsilon * idf_sum / terms.len() as f64;
            for stats in terms.values_mut() {
                if stats.idf < 0.0 {
                    stats.idf = floor;
                }
            }
        }

        info!(documents = documents.len(), terms = terms.len(), avgdl, "lexical index built");
        Ok(Self { documents, doc_lens, avgdl, terms, params })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Number of documents containing `term` (exact, case-sensitive).
    pub fn document_frequency(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, |t| t.postings.len())
    }
}
