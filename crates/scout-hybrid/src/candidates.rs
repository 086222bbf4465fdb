use scout_core::types::{Candidate, SemanticHit, SourceKind};
use scout_lexical::LexicalHit;

/// Ranks semantic hits in the order the vector store returned them.
///
/// Hits below `min_similarity` are dropped first, so ranks stay contiguous.
pub fn from_semantic(hits: Vec<SemanticHit>, top_k: usize, min_similarity: Option<f32>) -> Vec<Candidate> {
    hits.into_iter()
        .filter(|h| min_similarity.map_or(true, |floor| h.similarity >= floor))
        .take(top_k)
        .enumerate()
        .map(|(rank, h)| Candidate {
            id: h.id,
            payload: h.payload,
            source: SourceKind::Semantic,
            source_rank: rank,
            source_score: f64::from(h.similarity),
        })
        .collect()
}

pub fn from_lexical(hits: &[LexicalHit<'_>], top_k: usize) -> Vec<Candidate> {
    hits.iter()
        .take(top_k)
        .enumerate()
        .map(|(rank, h)| Candidate {
            id: h.document.id.clone(),
            payload: h.document.payload.clone(),
            source: SourceKind::Lexical,
            source_rank: rank,
            source_score: h.score,
        })
        .collect()
}
