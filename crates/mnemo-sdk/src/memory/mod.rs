//! Adaptive Memory System
//!
//! Hosts the adaptive layer over a vector store:
//! - Search: base vector ranking reranked with learned patterns
//! - Expansion: graph-adjacent entries with per-hop score decay
//! - Learning: manual inserts with a near-duplicate check and auto-linking
//! - Feedback: completed interactions become pattern samples and edges
//!
//! # Architecture
//!
//! [`AdaptiveMemory`] talks to any [`mnemo_core::GraphBackend`].
//! [`MemoryVectorStore`] is the in-process implementation used by the SDK
//! and the tests.

mod adaptive;
mod store;
mod types;

pub use adaptive::AdaptiveMemory;
pub use store::MemoryVectorStore;
pub use types::{
    ExpandRequest, FeedbackOutcome, GraphHit, Interaction, LearnOutcome, LearnRequest,
    SearchRequest, Selection,
};
