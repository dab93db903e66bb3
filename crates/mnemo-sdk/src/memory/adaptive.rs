//! Adaptive Memory
//!
//! Ties the pattern store, the graph expander and a vector store backend
//! together behind the entry points a hosting layer calls: pattern-aware
//! search, graph expansion, manual learning and interaction feedback.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use mnemo_core::types::{
    FeedbackSample, Pattern, Sample, SearchFilter, SearchResult, VectorEntry,
};
use mnemo_core::{
    rerank, ExpansionResult, GraphBackend, GraphConfig, GraphConfigPatch, GraphExpander,
    IngestOutcome, PatternSnapshot, PatternStats, PatternStore, RerankMode,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::types::{
    ExpandRequest, FeedbackOutcome, GraphHit, Interaction, LearnOutcome, LearnRequest,
    SearchRequest,
};
use crate::config::{SDKConfig, SearchConfig};
use crate::error::{SDKError, SDKResult};
use crate::utils::content_hash;

/// Adaptive layer over a vector store
///
/// The pattern store and the expander sit behind their own locks so that
/// feedback ingest never blocks on graph writes and vice versa.
pub struct AdaptiveMemory {
    backend: Arc<dyn GraphBackend>,
    patterns: RwLock<PatternStore>,
    expander: RwLock<GraphExpander>,
    config: SearchConfig,
}

impl AdaptiveMemory {
    /// Create an adaptive memory over `backend`
    pub fn new(backend: Arc<dyn GraphBackend>, config: &SDKConfig) -> Self {
        Self {
            patterns: RwLock::new(PatternStore::new(config.patterns.clone())),
            expander: RwLock::new(GraphExpander::new(backend.clone(), config.graph.clone())),
            backend,
            config: config.search.clone(),
        }
    }

    /// The underlying vector store
    pub fn backend(&self) -> &Arc<dyn GraphBackend> {
        &self.backend
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search & Expansion
    // ─────────────────────────────────────────────────────────────────────────

    /// Vector search, reranked with learned patterns when requested
    pub async fn search(&self, request: SearchRequest) -> SDKResult<Vec<SearchResult>> {
        let results = self.backend.search(&request.vector, request.limit, None).await?;

        if !request.use_patterns || results.is_empty() {
            return Ok(results);
        }

        Ok(self
            .rerank(results, &request.vector, request.pattern_boost, request.mode)
            .await)
    }

    /// Rerank an externally produced result list with learned patterns
    ///
    /// `pattern_boost` is clamped to `[0, 1]` and falls back to the
    /// configured default.
    pub async fn rerank(
        &self,
        results: Vec<SearchResult>,
        query_vector: &[f32],
        pattern_boost: Option<f32>,
        mode: RerankMode,
    ) -> Vec<SearchResult> {
        let boost = pattern_boost
            .unwrap_or(self.config.default_pattern_boost)
            .clamp(0.0, 1.0);

        let patterns = self.patterns.read().await;
        rerank(results, query_vector, &patterns, boost, mode)
    }

    /// Entries reachable from `results` through the graph
    ///
    /// Scores decay by `hop_decay` per hop. Entries already in `results` are
    /// left out, and an entry reached from several results keeps its best
    /// score. Neighbor lookups that fail are logged and skipped.
    pub async fn expand(&self, request: ExpandRequest) -> Vec<GraphHit> {
        let cap = self.config.expansion_cap(request.limit);
        let original: HashSet<&str> = request.results.iter().map(|r| r.id()).collect();

        let mut best: HashMap<String, GraphHit> = HashMap::new();

        for result in &request.results {
            let neighbors = match self.backend.neighbors(result.id(), request.depth).await {
                Ok(neighbors) => neighbors,
                Err(e) => {
                    warn!("Neighbor lookup failed for {}: {}", result.id(), e);
                    continue;
                }
            };

            for neighbor in neighbors {
                if original.contains(neighbor.id.as_str()) {
                    continue;
                }
                let score = result.score * self.config.hop_decay.powi(neighbor.depth as i32);
                if best.get(&neighbor.id).is_some_and(|hit| hit.score >= score) {
                    continue;
                }
                best.insert(
                    neighbor.id.clone(),
                    GraphHit {
                        entry: VectorEntry {
                            id: neighbor.id,
                            vector: Vec::new(),
                            metadata: Default::default(),
                        },
                        score,
                        depth: neighbor.depth,
                        via: result.id().to_string(),
                        labels: neighbor.labels,
                    },
                );
            }
        }

        let mut ranked: Vec<GraphHit> = best.into_values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });

        // Entries are fetched lazily so only the kept hits cost a lookup
        let mut hits = Vec::new();
        for mut hit in ranked {
            if hits.len() >= cap {
                break;
            }
            match self.backend.get(&hit.entry.id).await {
                Ok(Some(entry)) => {
                    hit.entry = entry;
                    hits.push(hit);
                }
                Ok(None) => debug!("Neighbor {} has no stored entry", hit.entry.id),
                Err(e) => warn!("Failed to fetch neighbor {}: {}", hit.entry.id, e),
            }
        }

        hits
    }

    /// Link co-retrieved results for `query`
    pub async fn expand_from_search(&self, query: &str, results: &[SearchResult]) -> ExpansionResult {
        self.expander.read().await.expand_from_search(query, results).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Learning
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a new entry unless a near-identical one exists
    pub async fn learn(&self, request: LearnRequest) -> SDKResult<LearnOutcome> {
        if request.vector.is_empty() {
            return Err(SDKError::invalid_operation("cannot learn an empty vector"));
        }

        let nearest = self.backend.search(&request.vector, 1, None).await?;
        if let Some(top) = nearest.into_iter().next() {
            if top.score >= self.config.duplicate_threshold {
                debug!("Vector duplicates {} ({:.3})", top.id(), top.score);
                return Ok(LearnOutcome::Duplicate {
                    existing_id: top.entry.id,
                    similarity: top.score,
                });
            }
        }

        let mut metadata = request.metadata;
        if let Some(content) = &metadata.content {
            metadata
                .extra
                .insert("content_hash".to_string(), Value::String(content_hash(content)));
        }

        let entry = VectorEntry {
            id: request.id.unwrap_or_default(),
            vector: request.vector,
            metadata,
        };
        let vector = entry.vector.clone();
        let id = self.backend.insert(entry).await?;

        let (suggestions, links) = if request.auto_link {
            let filter = SearchFilter {
                exclude_ids: vec![id.clone()],
                ..Default::default()
            };
            // The entry is already stored, so a failed lookup only costs the links
            let candidates = match self
                .backend
                .search(&vector, self.config.auto_link_candidates, Some(&filter))
                .await
            {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Auto-link search failed for {}: {}", id, e);
                    Vec::new()
                }
            };

            let expander = self.expander.read().await;
            let suggestions = expander.suggest_relationships(&id, Some(&candidates)).await;
            let links = expander.link_suggestions(&id, &suggestions).await;
            (suggestions, links)
        } else {
            (Vec::new(), ExpansionResult::default())
        };

        info!(
            "Learned {} ({} suggestions, {} edges created)",
            id,
            suggestions.len(),
            links.created_edges
        );

        Ok(LearnOutcome::Stored {
            id,
            suggestions,
            links,
        })
    }

    /// Feed a completed interaction back as learning signal
    ///
    /// Each selection becomes a pattern sample and a feedback edge.
    pub async fn record_interaction(&self, interaction: Interaction) -> FeedbackOutcome {
        let mut outcome = FeedbackOutcome::default();

        {
            let mut patterns = self.patterns.write().await;
            for selection in &interaction.selections {
                let sample = Sample::new(
                    interaction.query_vector.clone(),
                    selection.result_vector.clone(),
                    selection.relevance_score,
                );
                let sample_id = sample.id.clone();
                let ingest = patterns.add_sample(sample);
                if ingest.is_accepted() {
                    outcome.sample_ids.push(sample_id);
                    outcome.reclustered |= ingest.reclustered();
                } else {
                    outcome.rejected_samples += 1;
                }
            }
        }

        let feedback: Vec<FeedbackSample> = interaction
            .selections
            .iter()
            .map(|selection| FeedbackSample {
                query_id: interaction.query_id.clone(),
                result_id: selection.result_id.clone(),
                relevance_score: selection.relevance_score,
            })
            .collect();

        outcome.graph = self.expander.read().await.expand_from_feedback(&feedback).await;
        outcome
    }

    /// Record a single sample
    pub async fn add_sample(&self, sample: Sample) -> IngestOutcome {
        self.patterns.write().await.add_sample(sample)
    }

    /// Learned patterns closest to `vector`
    pub async fn find_patterns(&self, vector: &[f32], k: usize) -> Vec<Pattern> {
        self.patterns.read().await.find_similar(vector, k)
    }

    /// Revise the relevance of a stored sample
    pub async fn update_feedback(&self, sample_id: &str, relevance_score: f32) -> bool {
        self.patterns
            .write()
            .await
            .update_from_feedback(sample_id, relevance_score)
    }

    /// Run a cluster pass now
    pub async fn cluster(&self) -> usize {
        self.patterns.write().await.cluster()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration & State
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn graph_config(&self) -> GraphConfig {
        self.expander.read().await.config().clone()
    }

    pub async fn update_graph_config(&self, patch: GraphConfigPatch) {
        self.expander.write().await.update_config(patch);
    }

    pub async fn pattern_stats(&self) -> PatternStats {
        self.patterns.read().await.stats()
    }

    pub async fn export_patterns(&self) -> PatternSnapshot {
        self.patterns.read().await.export()
    }

    /// Replace pattern state from an untrusted JSON blob
    pub async fn import_patterns(&self, blob: &Value) -> SDKResult<()> {
        self.patterns.write().await.import_value(blob)?;
        Ok(())
    }

    /// Write the pattern snapshot as JSON
    pub async fn save_patterns(&self, path: &Path) -> SDKResult<()> {
        let value = self.export_patterns().await.to_value()?;
        let json = serde_json::to_string_pretty(&value)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;

        info!("Saved pattern snapshot to {}", path.display());
        Ok(())
    }

    /// Load a pattern snapshot written by [`save_patterns`](Self::save_patterns)
    pub async fn load_patterns(&self, path: &Path) -> SDKResult<()> {
        let json = tokio::fs::read_to_string(path).await?;
        let value: Value = serde_json::from_str(&json)?;
        self.import_patterns(&value).await?;

        info!("Loaded pattern snapshot from {}", path.display());
        Ok(())
    }
}
