//! Relationship inference from memory categories.

use serde::{Deserialize, Serialize};

use crate::types::{MemoryCategory, RelationshipKind};

/// A proposed edge from a node to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSuggestion {
    pub target_id: String,
    /// The candidate's search score
    pub confidence: f32,
    pub reason: String,
    pub relationship: RelationshipKind,
}

/// Relationship implied by a candidate's category.
pub fn infer_relationship(category: MemoryCategory) -> RelationshipKind {
    match category {
        MemoryCategory::Preference => RelationshipKind::SharesPreference,
        MemoryCategory::Fact => RelationshipKind::SupportsFact,
        MemoryCategory::Decision => RelationshipKind::InformsDecision,
        MemoryCategory::Entity => RelationshipKind::MentionsEntity,
        MemoryCategory::Other => RelationshipKind::RelatedTo,
    }
}

/// Human-readable reason for a suggestion.
pub fn describe(category: MemoryCategory, score: f32) -> String {
    let basis = match category {
        MemoryCategory::Preference => "expresses a related preference",
        MemoryCategory::Fact => "records a supporting fact",
        MemoryCategory::Decision => "records a related decision",
        MemoryCategory::Entity => "mentions a related entity",
        MemoryCategory::Other => "is semantically similar",
    };
    format!("candidate {basis} (similarity {score:.2})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_relationship() {
        assert_eq!(
            infer_relationship(MemoryCategory::Preference),
            RelationshipKind::SharesPreference
        );
        assert_eq!(infer_relationship(MemoryCategory::Other), RelationshipKind::RelatedTo);
    }

    #[test]
    fn test_describe() {
        let reason = describe(MemoryCategory::Fact, 0.912);
        assert!(reason.contains("fact"));
        assert!(reason.contains("0.91"));
    }
}
