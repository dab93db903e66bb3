//! Pattern store and graph expander configuration.

use serde::{Deserialize, Serialize};

/// Pattern store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Samples scoring below this are dropped at ingest (default: 0.5)
    pub quality_threshold: f32,

    /// Minimum samples before clustering runs, and target cluster size (default: 3)
    pub min_samples_per_cluster: usize,

    /// Upper bound on the number of clusters (default: 10)
    pub max_clusters: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            quality_threshold: 0.5,
            min_samples_per_cluster: 3,
            max_clusters: 10,
        }
    }
}

impl PatternConfig {
    /// Number of accepted samples between automatic cluster passes
    pub fn recluster_interval(&self) -> usize {
        2 * self.min_samples_per_cluster.max(1)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(ConfigValidationError::InvalidValue {
                field: "patterns.quality_threshold".into(),
                message: "must be between 0 and 1".into(),
            });
        }

        if self.min_samples_per_cluster == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "patterns.min_samples_per_cluster".into(),
                message: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

/// Graph expander configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Combined score a pair must exceed to be linked (default: 0.7)
    pub similarity_threshold: f32,

    /// Maximum pairs linked per `expand_from_search` call (default: 10)
    pub max_edges_per_expansion: usize,

    /// Mirror every created edge in the reverse direction (default: false)
    pub bidirectional: bool,

    /// Depth used when looking up existing neighbors (default: 1)
    pub neighbor_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            max_edges_per_expansion: 10,
            bidirectional: false,
            neighbor_depth: 1,
        }
    }
}

impl GraphConfig {
    /// Apply a partial update. Fields left as `None` keep their value.
    pub fn apply(&mut self, patch: GraphConfigPatch) {
        if let Some(threshold) = patch.similarity_threshold {
            self.similarity_threshold = threshold;
        }
        if let Some(max_edges) = patch.max_edges_per_expansion {
            self.max_edges_per_expansion = max_edges;
        }
        if let Some(bidirectional) = patch.bidirectional {
            self.bidirectional = bidirectional;
        }
        if let Some(depth) = patch.neighbor_depth {
            self.neighbor_depth = depth;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigValidationError::InvalidValue {
                field: "graph.similarity_threshold".into(),
                message: "must be between 0 and 1".into(),
            });
        }

        if self.neighbor_depth == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "graph.neighbor_depth".into(),
                message: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

/// Partial update for [`GraphConfig`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfigPatch {
    pub similarity_threshold: Option<f32>,
    pub max_edges_per_expansion: Option<usize>,
    pub bidirectional: Option<bool>,
    pub neighbor_depth: Option<usize>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
