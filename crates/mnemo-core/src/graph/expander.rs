//! Graph expander: turns co-retrieval and selection signals into edges.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::GraphBackend;
use super::relationship::{describe, infer_relationship, RelationshipSuggestion};
use crate::config::{GraphConfig, GraphConfigPatch};
use crate::types::{FeedbackSample, GraphEdge, RelationshipKind, SearchResult};
use crate::vector::combined_score;

/// Counters for one expansion call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpansionResult {
    pub created_edges: usize,
    /// Edges that already existed, or would have been self-loops
    pub skipped_edges: usize,
    /// Edges the backend failed to check or create
    pub failed_edges: usize,
    pub processing_time_ms: u64,
    /// Edges created by this call
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkOutcome {
    Created,
    Skipped,
    Failed,
}

/// Creates edges in the relationship graph.
///
/// Every edge goes through check-then-create against the backend, awaited
/// one at a time. Two expanders writing the same pair concurrently are not
/// guarded against each other.
pub struct GraphExpander {
    backend: Arc<dyn GraphBackend>,
    config: GraphConfig,
}

impl GraphExpander {
    /// Create a new graph expander
    pub fn new(backend: Arc<dyn GraphBackend>, config: GraphConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Patch configuration. Takes effect from the next call.
    pub fn update_config(&mut self, patch: GraphConfigPatch) {
        self.config.apply(patch);
    }

    /// Link pairs of results whose combined score exceeds the threshold.
    ///
    /// Pairs are visited in result order, so higher-ranked pairs win when
    /// `max_edges_per_expansion` cuts the call short.
    pub async fn expand_from_search(&self, query: &str, results: &[SearchResult]) -> ExpansionResult {
        let start = Instant::now();
        let config = self.config.clone();
        let mut outcome = ExpansionResult::default();

        if results.len() >= 2 {
            let mut pairs_linked = 0usize;

            'pairs: for (i, source) in results.iter().enumerate() {
                for (j, target) in results.iter().enumerate().skip(i + 1) {
                    if pairs_linked >= config.max_edges_per_expansion {
                        break 'pairs;
                    }

                    let weight = combined_score(source.score, target.score);
                    if weight <= config.similarity_threshold {
                        continue;
                    }

                    let edge = GraphEdge::new(
                        source.id(),
                        target.id(),
                        RelationshipKind::CoRetrieved,
                        weight,
                    )
                    .with_property("query", query)
                    .with_property("source_rank", i)
                    .with_property("target_rank", j);

                    if self.link(edge, config.bidirectional, &mut outcome).await == LinkOutcome::Created {
                        pairs_linked += 1;
                    }
                }
            }
        }

        outcome.processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Search expansion: {} created, {} skipped, {} failed",
            outcome.created_edges, outcome.skipped_edges, outcome.failed_edges
        );
        outcome
    }

    /// Propose relationships between `node_id` and `candidates`.
    ///
    /// Does not search by itself: without candidates there is nothing to
    /// suggest. Existing neighbors and candidates at or below the threshold
    /// are filtered out.
    pub async fn suggest_relationships(
        &self,
        node_id: &str,
        candidates: Option<&[SearchResult]>,
    ) -> Vec<RelationshipSuggestion> {
        match self.backend.get(node_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to fetch node {}: {}", node_id, e);
                return Vec::new();
            }
        }

        let Some(candidates) = candidates.filter(|c| !c.is_empty()) else {
            return Vec::new();
        };

        let neighbors: HashSet<String> = match self
            .backend
            .neighbors(node_id, self.config.neighbor_depth)
            .await
        {
            Ok(neighbors) => neighbors.into_iter().map(|n| n.id).collect(),
            Err(e) => {
                warn!("Neighbor lookup failed for {}: {}", node_id, e);
                HashSet::new()
            }
        };

        candidates
            .iter()
            .filter(|c| c.id() != node_id && !neighbors.contains(c.id()))
            .filter(|c| c.score > self.config.similarity_threshold)
            .map(|c| {
                let category = c.entry.metadata.category;
                RelationshipSuggestion {
                    target_id: c.id().to_string(),
                    confidence: c.score,
                    reason: describe(category, c.score),
                    relationship: infer_relationship(category),
                }
            })
            .collect()
    }

    /// Create the edges proposed by [`suggest_relationships`](Self::suggest_relationships).
    pub async fn link_suggestions(
        &self,
        node_id: &str,
        suggestions: &[RelationshipSuggestion],
    ) -> ExpansionResult {
        let start = Instant::now();
        let bidirectional = self.config.bidirectional;
        let mut outcome = ExpansionResult::default();

        for suggestion in suggestions {
            let edge = GraphEdge::new(
                node_id,
                suggestion.target_id.as_str(),
                suggestion.relationship,
                suggestion.confidence.clamp(0.0, 1.0),
            )
            .with_property("reason", suggestion.reason.as_str());

            self.link(edge, bidirectional, &mut outcome).await;
        }

        outcome.processing_time_ms = start.elapsed().as_millis() as u64;
        outcome
    }

    /// Turn selection feedback into edges.
    ///
    /// Each sample above the threshold yields `result -> query`
    /// (`selected_from`). Any two samples that share a query are linked to
    /// each other (`co_selected`) whatever their scores.
    pub async fn expand_from_feedback(&self, samples: &[FeedbackSample]) -> ExpansionResult {
        let start = Instant::now();
        let config = self.config.clone();
        let mut outcome = ExpansionResult::default();

        for sample in samples
            .iter()
            .filter(|s| s.relevance_score > config.similarity_threshold)
        {
            let edge = GraphEdge::new(
                sample.result_id.as_str(),
                sample.query_id.as_str(),
                RelationshipKind::SelectedFrom,
                sample.relevance_score.clamp(0.0, 1.0),
            );
            self.link(edge, false, &mut outcome).await;
        }

        let mut order: Vec<&str> = Vec::new();
        let mut by_query: HashMap<&str, Vec<&FeedbackSample>> = HashMap::new();
        for sample in samples {
            let group = by_query.entry(sample.query_id.as_str()).or_insert_with(|| {
                order.push(sample.query_id.as_str());
                Vec::new()
            });
            group.push(sample);
        }

        for query_id in order {
            let group = &by_query[query_id];
            for (i, a) in group.iter().enumerate() {
                for b in group.iter().skip(i + 1) {
                    let edge = GraphEdge::new(
                        a.result_id.as_str(),
                        b.result_id.as_str(),
                        RelationshipKind::CoSelected,
                        combined_score(a.relevance_score, b.relevance_score),
                    )
                    .with_property("query_id", query_id);

                    self.link(edge, config.bidirectional, &mut outcome).await;
                }
            }
        }

        outcome.processing_time_ms = start.elapsed().as_millis() as u64;
        outcome
    }

    /// Check-then-create `edge`, then its mirror when `mirror` is set and
    /// the forward edge was created. Returns the outcome of the forward edge.
    async fn link(&self, edge: GraphEdge, mirror: bool, outcome: &mut ExpansionResult) -> LinkOutcome {
        let reverse = mirror.then(|| edge.reversed());
        let forward = self.link_one(edge, outcome).await;

        if let Some(reverse) = reverse.filter(|_| forward == LinkOutcome::Created) {
            self.link_one(reverse, outcome).await;
        }

        forward
    }

    async fn link_one(&self, edge: GraphEdge, outcome: &mut ExpansionResult) -> LinkOutcome {
        if edge.source_id == edge.target_id {
            outcome.skipped_edges += 1;
            return LinkOutcome::Skipped;
        }

        match self.backend.edge_exists(&edge.source_id, &edge.target_id).await {
            Ok(true) => {
                debug!("Edge {} -> {} exists, skipping", edge.source_id, edge.target_id);
                outcome.skipped_edges += 1;
                LinkOutcome::Skipped
            }
            Ok(false) => match self.backend.add_edge(edge.clone()).await {
                Ok(_) => {
                    outcome.created_edges += 1;
                    outcome.edges.push(edge);
                    LinkOutcome::Created
                }
                Err(e) => {
                    warn!("Failed to create edge {} -> {}: {}", edge.source_id, edge.target_id, e);
                    outcome.failed_edges += 1;
                    LinkOutcome::Failed
                }
            },
            Err(e) => {
                warn!("Edge check failed for {} -> {}: {}", edge.source_id, edge.target_id, e);
                outcome.failed_edges += 1;
                LinkOutcome::Failed
            }
        }
    }
}
