//! Relationship graph expansion.
//!
//! Links memory entries that are retrieved or selected together, and
//! proposes category-driven relationships for a node given candidates.
//!
//! # Failure handling
//!
//! Backend errors while checking or creating a single edge are logged and
//! counted in [`ExpansionResult::failed_edges`]; the rest of the batch
//! carries on.

mod backend;
mod expander;
mod relationship;

pub use backend::{GraphBackend, VectorStore};
pub use expander::{ExpansionResult, GraphExpander};
pub use relationship::{describe, infer_relationship, RelationshipSuggestion};
