//! Pattern store.
//!
//! Holds raw (query, result, relevance) samples and partitions them into
//! quality-weighted clusters by proximity of their query vectors.
//!
//! # Lifecycle
//!
//! 1. Samples below the quality threshold are dropped at ingest
//! 2. Every `2 × min_samples_per_cluster` accepted samples trigger a full
//!    cluster pass that replaces the previous cluster set
//! 3. Feedback revises a sample's score and patches its cluster's quality
//!    without reclustering
//!
//! Export/import is the only persistence hook; wiring it to storage is up
//! to the caller.

mod clustering;
mod snapshot;
mod store;

pub use clustering::partition;
pub use snapshot::PatternSnapshot;
pub use store::{IngestOutcome, PatternStats, PatternStore};
