//! mnemo-core - Adaptive layer over vector memory search
//!
//! This crate holds the algorithmic core shared by the SDK and the CLI:
//!
//! - **patterns**: Sample ingestion, clustering, similarity lookup, feedback, export/import
//! - **graph**: Edge creation from co-retrieval and selection feedback
//! - **rerank**: Fusing learned patterns into a base relevance ranking
//! - **types**: Samples, clusters, entries, edges
//! - **vector**: Cosine similarity and related helpers
//!
//! Everything here is synchronous and in-memory except the graph expander,
//! which awaits the [`graph::GraphBackend`] collaborator.

pub mod config;
pub mod error;
pub mod graph;
pub mod patterns;
pub mod rerank;
pub mod types;
pub mod vector;

// Re-export commonly used types
pub use config::{ConfigValidationError, GraphConfig, GraphConfigPatch, PatternConfig};
pub use error::{Error, Result};
pub use graph::{ExpansionResult, GraphBackend, GraphExpander, RelationshipSuggestion, VectorStore};
pub use patterns::{IngestOutcome, PatternSnapshot, PatternStats, PatternStore};
pub use rerank::{rerank, RerankMode, DEFAULT_PATTERN_BOOST};
