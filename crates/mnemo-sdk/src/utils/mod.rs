//! SDK Utilities
//!
//! Common utilities for the SDK.

mod hashing;

pub use hashing::{content_hash, edge_id};
