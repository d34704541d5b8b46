//! Maximal marginal relevance re-ranking

use std::collections::HashSet;

use crate::domain::embedding::dot;
use crate::domain::index::ScoredPassage;

/// Drop repeated passage ids, keeping the first occurrence
pub fn dedup_by_id(candidates: Vec<ScoredPassage>) -> Vec<ScoredPassage> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.id()))
        .collect()
}

/// Greedy MMR selection of up to `k` candidates.
///
/// The first pick is the most similar candidate. Each following pick maximises
/// `lambda * score - (1 - lambda) * max_sim_to_selected`, where similarity
/// between passages is the inner product of their normalised embeddings. Ties
/// go to the earlier candidate. `lambda` is clamped to [0, 1].
pub fn mmr_select(candidates: Vec<ScoredPassage>, k: usize, lambda: f32) -> Vec<ScoredPassage> {
    let lambda = lambda.clamp(0.0, 1.0);
    let mut remaining = candidates;
    let mut selected: Vec<ScoredPassage> = Vec::with_capacity(k.min(remaining.len()));

    while selected.len() < k && !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_value = f32::NEG_INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let value = if selected.is_empty() {
                candidate.score
            } else {
                let redundancy = selected
                    .iter()
                    .map(|s| dot(&candidate.passage.embedding, &s.passage.embedding))
                    .fold(f32::NEG_INFINITY, f32::max);
                lambda * candidate.score - (1.0 - lambda) * redundancy
            };

            if value > best_value {
                best_value = value;
                best_idx = idx;
            }
        }

        let pick = remaining.remove(best_idx).with_mmr_score(best_value);
        selected.push(pick);
    }

    selected
}
