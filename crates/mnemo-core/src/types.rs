//! Shared types for mnemo-core.
//!
//! These types are used by the pattern store, the graph expander and the
//! collaborator traits the hosting layer implements.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Types
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded (query, result, relevance) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub query_vector: Vec<f32>,
    pub result_vector: Vec<f32>,
    /// Relevance in `[0, 1]`; the only field feedback may revise.
    pub relevance_score: f32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Sample {
    /// Create a sample with a fresh id and the current timestamp.
    pub fn new(query_vector: Vec<f32>, result_vector: Vec<f32>, relevance_score: f32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query_vector,
            result_vector,
            relevance_score,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// A learned group of samples summarized by a centroid and average quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    /// Mean of the members' query vectors.
    pub centroid: Vec<f32>,
    pub member_ids: BTreeSet<String>,
    pub avg_quality: f32,
}

impl Cluster {
    /// Number of member samples
    pub fn size(&self) -> usize {
        self.member_ids.len()
    }

    /// Project this cluster into a read-only pattern view.
    pub fn to_pattern(&self, similarity: f32) -> Pattern {
        Pattern {
            id: self.id.clone(),
            centroid: self.centroid.clone(),
            cluster_size: self.size(),
            avg_quality: self.avg_quality,
            similarity,
        }
    }
}

/// Read view of a [`Cluster`] returned by similarity lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub centroid: Vec<f32>,
    pub cluster_size: usize,
    pub avg_quality: f32,
    /// Cosine similarity between the lookup vector and the centroid.
    pub similarity: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Entry Types
// ─────────────────────────────────────────────────────────────────────────────

/// Known memory categories. Anything unrecognised deserializes to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    Preference,
    Fact,
    Decision,
    Entity,
    #[default]
    #[serde(other)]
    Other,
}

impl MemoryCategory {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preference => "preference",
            Self::Fact => "fact",
            Self::Decision => "decision",
            Self::Entity => "entity",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata attached to a stored vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    #[serde(default)]
    pub category: MemoryCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EntryMetadata {
    /// Metadata with only a category set
    pub fn with_category(category: MemoryCategory) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }
}

/// An entry held by the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: EntryMetadata,
}

/// A ranked hit from the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entry: VectorEntry,
    pub score: f32,
}

impl SearchResult {
    pub fn id(&self) -> &str {
        &self.entry.id
    }
}

/// Optional filter for vector store searches.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub category: Option<MemoryCategory>,
    pub exclude_ids: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Graph Types
// ─────────────────────────────────────────────────────────────────────────────

/// Relationship carried by a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Both entries appeared together in one search result list
    CoRetrieved,
    /// Result was chosen for a query
    SelectedFrom,
    /// Two results were chosen for the same query
    CoSelected,
    SharesPreference,
    SupportsFact,
    InformsDecision,
    MentionsEntity,
    RelatedTo,
}

impl RelationshipKind {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoRetrieved => "co_retrieved",
            Self::SelectedFrom => "selected_from",
            Self::CoSelected => "co_selected",
            Self::SharesPreference => "shares_preference",
            Self::SupportsFact => "supports_fact",
            Self::InformsDecision => "informs_decision",
            Self::MentionsEntity => "mentions_entity",
            Self::RelatedTo => "related_to",
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directed edge in the relationship graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    pub relationship: RelationshipKind,
    pub weight: f32,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl GraphEdge {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship: RelationshipKind,
        weight: f32,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship,
            weight,
            properties: HashMap::new(),
        }
    }

    /// Attach a property
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// The same edge pointing the other way
    pub fn reversed(&self) -> Self {
        Self {
            source_id: self.target_id.clone(),
            target_id: self.source_id.clone(),
            relationship: self.relationship,
            weight: self.weight,
            properties: self.properties.clone(),
        }
    }
}

/// A node reachable from another node in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: String,
    /// Relationships on the edge that reached this node
    pub labels: Vec<String>,
    /// Hops from the origin node (1 = direct neighbor)
    pub depth: usize,
}

/// "This result was selected for this query."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSample {
    pub query_id: String,
    pub result_id: String,
    pub relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_conversion() {
        assert_eq!(MemoryCategory::Decision.as_str(), "decision");
        assert_eq!(MemoryCategory::Preference.to_string(), "preference");
    }

    #[test]
    fn test_unknown_category_deserializes_to_other() {
        let metadata: EntryMetadata =
            serde_json::from_value(serde_json::json!({ "category": "mood", "source": "chat" }))
                .unwrap();
        assert_eq!(metadata.category, MemoryCategory::Other);
        assert_eq!(metadata.extra.get("source"), Some(&serde_json::json!("chat")));
    }

    #[test]
    fn test_relationship_serializes_snake_case() {
        let edge = GraphEdge::new("a", "b", RelationshipKind::CoRetrieved, 0.8);
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["relationship"], "co_retrieved");

        let reversed = edge.reversed();
        assert_eq!(reversed.source_id, "b");
        assert_eq!(reversed.target_id, "a");
    }

    #[test]
    fn test_cluster_projection() {
        let cluster = Cluster {
            id: "c1".into(),
            centroid: vec![1.0, 0.0],
            member_ids: ["s1".to_string(), "s2".to_string()].into_iter().collect(),
            avg_quality: 0.9,
        };
        let pattern = cluster.to_pattern(0.75);
        assert_eq!(pattern.cluster_size, 2);
        assert_eq!(pattern.similarity, 0.75);
    }
}
