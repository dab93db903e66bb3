//! Collaborator interfaces consumed by the adaptive layer.
//!
//! Implementations wrap the actual vector index and graph storage
//! (in-memory, database, remote service, etc.).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GraphEdge, Neighbor, SearchFilter, SearchResult, VectorEntry};

/// Nearest-neighbor vector storage.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Entries nearest to `vector`, best first.
    async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<SearchResult>>;

    /// Fetch an entry by ID.
    async fn get(&self, id: &str) -> Result<Option<VectorEntry>>;

    /// Store an entry, returning its ID.
    async fn insert(&self, entry: VectorEntry) -> Result<String>;

    /// Delete an entry and its edges.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Graph extension over a vector store.
#[async_trait]
pub trait GraphBackend: VectorStore {
    /// Nodes reachable from `id` within `depth` hops.
    async fn neighbors(&self, id: &str, depth: usize) -> Result<Vec<Neighbor>>;

    /// Whether a directed edge `source_id -> target_id` exists.
    async fn edge_exists(&self, source_id: &str, target_id: &str) -> Result<bool>;

    /// Create an edge, returning its ID.
    async fn add_edge(&self, edge: GraphEdge) -> Result<String>;
}
