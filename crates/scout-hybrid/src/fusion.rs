//! Weighted reciprocal rank fusion.
//!
//! A candidate at 0-based rank `i` in a source with weight `w` contributes
//! `w / (i + 1)` to its document. Scores are never compared across sources,
//! only rank positions, so cosine similarities and BM25 scores need no
//! normalisation. Documents found by both sources accumulate both terms.
use std::collections::HashMap;

use scout_core::config::SearchSettings;
use scout_core::types::{Candidate, DocId, FusedResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub semantic: f64,
    pub lexical: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { semantic: 1.0, lexical: 0.5 }
    }
}

impl From<&SearchSettings> for FusionWeights {
    fn from(s: &SearchSettings) -> Self {
        Self { semantic: s.semantic_weight, lexical: s.lexical_weight }
    }
}

/// Accumulates per-document scores in first-seen order.
#[derive(Default)]
struct Accumulator {
    slots: HashMap<DocId, usize>,
    entries: Vec<FusedResult>,
}

impl Accumulator {
    fn add(&mut self, candidate: &Candidate, weight: f64) {
        let contribution = weight / (candidate.source_rank + 1) as f64;
        match self.slots.get(&candidate.id) {
            Some(&slot) => self.entries[slot].combined_score += contribution,
            None => {
                self.slots.insert(candidate.id.clone(), self.entries.len());
                self.entries.push(FusedResult {
                    id: candidate.id.clone(),
                    payload: candidate.payload.clone(),
                    combined_score: contribution,
                });
            }
        }
    }
}

/// Merges the two ranked lists into at most `top_k` results, best first.
///
/// Semantic candidates are accumulated before lexical ones; equal combined
/// scores keep that first-insertion order. A document's payload is taken
/// from the first candidate that introduced it.
pub fn fuse(semantic: &[Candidate], lexical: &[Candidate], weights: FusionWeights, top_k: usize) -> Vec<FusedResult> {
    let mut acc = Accumulator::default();
    for c in semantic {
        acc.add(c, weights.semantic);
    }
    for c in lexical {
        acc.add(c, weights.lexical);
    }
    let mut fused = acc.entries;
    fused.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    fused.truncate(top_k);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::types::{Payload, SourceKind};
    use serde_json::Value;

    fn ranked(ids: &[&str], source: SourceKind) -> Vec<Candidate> {
        ids.iter()
            .enumerate()
            .map(|(rank, id)| {
                let mut payload = Payload::new();
                payload.insert("from".into(), Value::String(format!("{source:?}")));
                Candidate { id: id.to_string(), payload, source, source_rank: rank, source_score: 0.0 }
            })
            .collect()
    }

    fn ids(results: &[FusedResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn two_source_example_scores_and_order() {
        let semantic = ranked(&["A", "B"], SourceKind::Semantic);
        let lexical = ranked(&["B", "C"], SourceKind::Lexical);
        let fused = fuse(&semantic, &lexical, FusionWeights::default(), 10);

        assert_eq!(ids(&fused), vec!["A", "B", "C"]);
        assert_eq!(fused[0].combined_score, 1.0);
        assert_eq!(fused[1].combined_score, 1.0);
        assert_eq!(fused[2].combined_score, 0.25);
    }

    #[test]
    fn agreement_between_sources_is_rewarded() {
        let semantic = ranked(&["A", "B", "C"], SourceKind::Semantic);
        let lexical = ranked(&["C"], SourceKind::Lexical);
        let fused = fuse(&semantic, &lexical, FusionWeights::default(), 10);
        // C: 1/3 + 0.5 = 0.833 > B: 0.5
        assert_eq!(ids(&fused), vec!["A", "C", "B"]);
    }

    #[test]
    fn payload_comes_from_first_source_seen() {
        let semantic = ranked(&["A"], SourceKind::Semantic);
        let lexical = ranked(&["A"], SourceKind::Lexical);
        let fused = fuse(&semantic, &lexical, FusionWeights::default(), 10);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].payload["from"], Value::String("Semantic".into()));
        assert_eq!(fused[0].combined_score, 1.5);
    }

    #[test]
    fn truncates_to_top_k_keeping_the_best() {
        let semantic = ranked(&["A", "B", "C"], SourceKind::Semantic);
        let lexical = ranked(&["D", "E"], SourceKind::Lexical);
        let fused = fuse(&semantic, &lexical, FusionWeights::default(), 2);
        // A=1.0, B=0.5, D=0.5, C=0.333, E=0.25
        assert_eq!(ids(&fused), vec!["A", "B"]);
    }

    #[test]
    fn empty_inputs_fuse_to_nothing() {
        assert!(fuse(&[], &[], FusionWeights::default(), 5).is_empty());
    }

    #[test]
    fn lexical_only_input_keeps_lexical_order() {
        let lexical = ranked(&["X", "Y"], SourceKind::Lexical);
        let fused = fuse(&[], &lexical, FusionWeights::default(), 5);
        assert_eq!(ids(&fused), vec!["X", "Y"]);
        assert_eq!(fused[0].combined_score, 0.5);
    }

    #[test]
    fn output_is_a_subset_of_the_inputs_and_deterministic() {
        let semantic = ranked(&["A", "B", "C", "D"], SourceKind::Semantic);
        let lexical = ranked(&["D", "E", "A"], SourceKind::Lexical);
        let first = fuse(&semantic, &lexical, FusionWeights::default(), 10);
        let second = fuse(&semantic, &lexical, FusionWeights::default(), 10);
        assert_eq!(first, second);
        for r in &first {
            assert!(semantic.iter().chain(&lexical).any(|c| c.id == r.id));
        }
        assert!(first.windows(2).all(|w| w[0].combined_score >= w[1].combined_score));
    }
}
