//! Pattern-aware reranking of search results.

use serde::{Deserialize, Serialize};

use crate::patterns::PatternStore;
use crate::types::SearchResult;

/// Boost applied when the caller does not pick one.
pub const DEFAULT_PATTERN_BOOST: f32 = 0.2;

/// Patterns matching with similarity at or below this are ignored.
pub const PATTERN_MATCH_FLOOR: f32 = 0.5;

/// Which vector is matched against the learned patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankMode {
    /// Match each result's own vector
    #[default]
    ResultVector,
    /// Match the query vector once and apply that pattern to every result
    QueryVector,
}

/// Boost scores using learned patterns and re-sort descending.
///
/// With no clusters the input is returned unchanged. Otherwise each score
/// becomes `score + boost × similarity × avg_quality`, clamped to `[0, 1]`.
/// `pattern_boost` is trusted to already be in `[0, 1]`.
pub fn rerank(
    results: Vec<SearchResult>,
    query_vector: &[f32],
    patterns: &PatternStore,
    pattern_boost: f32,
    mode: RerankMode,
) -> Vec<SearchResult> {
    if patterns.cluster_count() == 0 {
        return results;
    }

    let query_match = match mode {
        RerankMode::QueryVector => patterns.find_similar(query_vector, 1).into_iter().next(),
        RerankMode::ResultVector => None,
    };

    let mut reranked: Vec<SearchResult> = results
        .into_iter()
        .map(|mut result| {
            let best = match mode {
                RerankMode::QueryVector => query_match.clone(),
                RerankMode::ResultVector => {
                    patterns.find_similar(&result.entry.vector, 1).into_iter().next()
                }
            };

            let boost = best
                .filter(|pattern| pattern.similarity > PATTERN_MATCH_FLOOR)
                .map(|pattern| pattern_boost * pattern.similarity.min(1.0) * pattern.avg_quality)
                .unwrap_or(0.0);

            result.score = (result.score + boost).clamp(0.0, 1.0);
            result
        })
        .collect();

    reranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    reranked
}
