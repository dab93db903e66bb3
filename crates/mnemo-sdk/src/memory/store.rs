//! In-memory Vector Store
//!
//! Reference implementation of the vector store and graph collaborators.
//! Search is brute-force cosine similarity; edges are directed and keyed by
//! (source, target, relationship).

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use mnemo_core::types::{GraphEdge, Neighbor, SearchFilter, SearchResult, VectorEntry};
use mnemo_core::vector::cosine_similarity;
use mnemo_core::{GraphBackend, Result, VectorStore};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::utils::edge_id;

/// Vector store and relationship graph held in process memory
#[derive(Default)]
pub struct MemoryVectorStore {
    entries: RwLock<HashMap<String, VectorEntry>>,
    edges: RwLock<HashMap<String, GraphEdge>>,
}

impl MemoryVectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;

        let mut results: Vec<SearchResult> = entries
            .values()
            .filter(|entry| match filter {
                Some(filter) => {
                    filter.category.is_none_or(|c| c == entry.metadata.category)
                        && !filter.exclude_ids.contains(&entry.id)
                }
                None => true,
            })
            .map(|entry| SearchResult {
                score: cosine_similarity(vector, &entry.vector).clamp(0.0, 1.0),
                entry: entry.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        results.truncate(limit);
        Ok(results)
    }

    async fn get(&self, id: &str) -> Result<Option<VectorEntry>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn insert(&self, mut entry: VectorEntry) -> Result<String> {
        if entry.id.is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }
        let id = entry.id.clone();
        self.entries.write().await.insert(id.clone(), entry);
        Ok(id)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.entries.write().await.remove(id).is_some();
        self.edges
            .write()
            .await
            .retain(|_, edge| edge.source_id != id && edge.target_id != id);
        Ok(removed)
    }
}

#[async_trait]
impl GraphBackend for MemoryVectorStore {
    /// Breadth-first walk over edges in either direction.
    async fn neighbors(&self, id: &str, depth: usize) -> Result<Vec<Neighbor>> {
        let edges = self.edges.read().await;

        let mut adjacency: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
        for edge in edges.values() {
            let label = edge.relationship.as_str();
            adjacency
                .entry(edge.source_id.as_str())
                .or_default()
                .push((edge.target_id.as_str(), label));
            adjacency
                .entry(edge.target_id.as_str())
                .or_default()
                .push((edge.source_id.as_str(), label));
        }

        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut found: Vec<Neighbor> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(id, 0)]);

        while let Some((node, hops)) = queue.pop_front() {
            if hops >= depth {
                continue;
            }
            let Some(links) = adjacency.get(node) else {
                continue;
            };

            for &(next, label) in links {
                if next == id {
                    continue;
                }
                if let Some(&position) = positions.get(next) {
                    // Another edge into a node found at this same hop
                    let neighbor = &mut found[position];
                    if neighbor.depth == hops + 1 && !neighbor.labels.iter().any(|l| l == label) {
                        neighbor.labels.push(label.to_string());
                    }
                    continue;
                }
                if visited.insert(next) {
                    positions.insert(next, found.len());
                    found.push(Neighbor {
                        id: next.to_string(),
                        labels: vec![label.to_string()],
                        depth: hops + 1,
                    });
                    queue.push_back((next, hops + 1));
                }
            }
        }

        Ok(found)
    }

    async fn edge_exists(&self, source_id: &str, target_id: &str) -> Result<bool> {
        Ok(self
            .edges
            .read()
            .await
            .values()
            .any(|edge| edge.source_id == source_id && edge.target_id == target_id))
    }

    async fn add_edge(&self, edge: GraphEdge) -> Result<String> {
        let id = edge_id(&edge.source_id, &edge.target_id, edge.relationship.as_str());
        self.edges.write().await.insert(id.clone(), edge);
        Ok(id)
    }
}
