//! Mnemo SDK - Adaptive memory over a vector store
//!
//! This crate hosts the adaptive layer from `mnemo-core` behind a small set
//! of async entry points:
//!
//! - **memory** - Pattern-aware search, graph expansion, manual learning and
//!   interaction feedback ([`AdaptiveMemory`]), plus an in-memory
//!   [`MemoryVectorStore`]
//! - **config** - SDK configuration aggregating pattern, graph and search settings
//! - **utils** - Content and edge hashing
//!
//! # Example
//!
//! ```rust,no_run
//! use mnemo_sdk::{Interaction, SDK, SDKConfig, Selection};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let sdk = SDK::new(SDKConfig::default())?;
//!
//!     // Feed a completed query back as learning signal
//!     sdk.memory()
//!         .record_interaction(Interaction {
//!             query_id: "q-1".into(),
//!             query_vector: vec![1.0, 0.0],
//!             selections: vec![Selection {
//!                 result_id: "doc-7".into(),
//!                 result_vector: vec![0.9, 0.1],
//!                 relevance_score: 0.9,
//!             }],
//!         })
//!         .await;
//!
//!     Ok(())
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Re-export core modules from mnemo-core
// ─────────────────────────────────────────────────────────────────────────────

/// Shared types (samples, clusters, entries, edges)
pub use mnemo_core::types;

/// Pattern store and clustering
pub use mnemo_core::patterns;

/// Graph expander and collaborator traits
pub use mnemo_core::graph;

/// Error types from core
pub use mnemo_core::error as core_error;

// ─────────────────────────────────────────────────────────────────────────────
// SDK-specific modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod memory;
pub mod utils;

mod config;
mod error;
mod sdk;

// Re-export main SDK types
pub use config::{SDKConfig, SearchConfig};
pub use error::{SDKError, SDKResult};
pub use sdk::SDK;

pub use memory::{
    AdaptiveMemory, ExpandRequest, FeedbackOutcome, GraphHit, Interaction, LearnOutcome,
    LearnRequest, MemoryVectorStore, SearchRequest, Selection,
};
