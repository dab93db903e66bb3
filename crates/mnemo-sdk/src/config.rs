//! SDK Configuration
//!
//! Defines configuration options for the Mnemo SDK.

use mnemo_core::{ConfigValidationError, GraphConfig, PatternConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SDK configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SDKConfig {
    /// Pattern store configuration
    pub patterns: PatternConfig,

    /// Graph expander configuration
    pub graph: GraphConfig,

    /// Search entry point configuration
    pub search: SearchConfig,

    /// Pattern snapshot loaded on initialize and saved on shutdown (optional)
    pub snapshot_path: Option<PathBuf>,
}

/// Search, expansion and learning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Similarity at which a learned vector counts as a duplicate (default: 0.95)
    pub duplicate_threshold: f32,

    /// Score multiplier applied per graph hop (default: 0.8)
    pub hop_decay: f32,

    /// Pattern boost used when a request does not set one (default: 0.2)
    pub default_pattern_boost: f32,

    /// Candidates fetched when auto-linking a learned entry (default: 10)
    pub auto_link_candidates: usize,

    /// Floor on the number of graph expansion results (default: 3)
    pub min_expansion_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.95,
            hop_decay: 0.8,
            default_pattern_boost: mnemo_core::DEFAULT_PATTERN_BOOST,
            auto_link_candidates: 10,
            min_expansion_results: 3,
        }
    }
}

impl SearchConfig {
    /// Maximum graph expansion results for a search `limit`
    pub fn expansion_cap(&self, limit: usize) -> usize {
        self.min_expansion_results.max(limit / 3)
    }
}

impl SDKConfig {
    /// Set pattern store configuration
    pub fn with_patterns(mut self, patterns: PatternConfig) -> Self {
        self.patterns = patterns;
        self
    }

    /// Set graph expander configuration
    pub fn with_graph(mut self, graph: GraphConfig) -> Self {
        self.graph = graph;
        self
    }

    /// Set search configuration
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Set the snapshot path
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.patterns.validate()?;
        self.graph.validate()?;

        if self.search.hop_decay <= 0.0 || self.search.hop_decay > 1.0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "search.hop_decay".into(),
                message: "must be greater than 0 and at most 1".into(),
            });
        }

        if !(0.0..=1.0).contains(&self.search.duplicate_threshold) {
            return Err(ConfigValidationError::InvalidValue {
                field: "search.duplicate_threshold".into(),
                message: "must be between 0 and 1".into(),
            });
        }

        if !(0.0..=1.0).contains(&self.search.default_pattern_boost) {
            return Err(ConfigValidationError::InvalidValue {
                field: "search.default_pattern_boost".into(),
                message: "must be between 0 and 1".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SDKConfig::default();
        assert_eq!(config.search.duplicate_threshold, 0.95);
        assert_eq!(config.search.hop_decay, 0.8);
        assert!(config.snapshot_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SDKConfig::default()
            .with_graph(GraphConfig {
                bidirectional: true,
                ..Default::default()
            })
            .with_snapshot("/tmp/patterns.json");

        assert!(config.graph.bidirectional);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/patterns.json")));
    }

    #[test]
    fn test_config_validation() {
        let mut config = SDKConfig::default();
        config.search.hop_decay = 0.0;
        assert!(config.validate().is_err());

        config.search.hop_decay = 0.8;
        config.patterns.min_samples_per_cluster = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expansion_cap() {
        let search = SearchConfig::default();
        assert_eq!(search.expansion_cap(5), 3);
        assert_eq!(search.expansion_cap(30), 10);
    }
}
