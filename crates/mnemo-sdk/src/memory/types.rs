//! Request and response types for the adaptive memory entry points.

use mnemo_core::types::{EntryMetadata, SearchResult, VectorEntry};
use mnemo_core::{ExpansionResult, RelationshipSuggestion, RerankMode};
use serde::{Deserialize, Serialize};

/// Search with optional pattern reranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub vector: Vec<f32>,
    pub limit: usize,
    /// Rerank with learned patterns (default: true)
    #[serde(default = "default_true")]
    pub use_patterns: bool,
    /// Boost strength, clamped to `[0, 1]`; falls back to the configured default
    pub pattern_boost: Option<f32>,
    #[serde(default)]
    pub mode: RerankMode,
}

impl SearchRequest {
    pub fn new(vector: Vec<f32>, limit: usize) -> Self {
        Self {
            vector,
            limit,
            use_patterns: true,
            pattern_boost: None,
            mode: RerankMode::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Pull graph-adjacent entries for a result list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandRequest {
    pub results: Vec<SearchResult>,
    /// Maximum hops to follow
    pub depth: usize,
    /// Search limit the results came from; bounds the expansion size
    pub limit: usize,
}

/// An entry reached through the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphHit {
    pub entry: VectorEntry,
    /// Originating result score decayed once per hop
    pub score: f32,
    pub depth: usize,
    /// Result the hit was reached from
    pub via: String,
    pub labels: Vec<String>,
}

/// Manually store a new memory vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnRequest {
    /// Entry id; generated when absent
    pub id: Option<String>,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: EntryMetadata,
    /// Suggest and create relationships to similar entries
    #[serde(default)]
    pub auto_link: bool,
}

/// Result of a learn call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LearnOutcome {
    Stored {
        id: String,
        suggestions: Vec<RelationshipSuggestion>,
        links: ExpansionResult,
    },
    /// An existing entry is near-identical; nothing was stored
    Duplicate { existing_id: String, similarity: f32 },
}

impl LearnOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// One result the user picked for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub result_id: String,
    pub result_vector: Vec<f32>,
    pub relevance_score: f32,
}

/// A completed query and the results chosen for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub query_id: String,
    pub query_vector: Vec<f32>,
    pub selections: Vec<Selection>,
}

/// Learning signal applied from one interaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    /// Ids of the samples the pattern store kept
    pub sample_ids: Vec<String>,
    pub rejected_samples: usize,
    pub reclustered: bool,
    pub graph: ExpansionResult,
}
