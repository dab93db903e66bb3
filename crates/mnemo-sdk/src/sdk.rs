//! Main SDK Entry Point
//!
//! Provides the main SDK struct that ties together all components.

use std::sync::Arc;

use mnemo_core::GraphBackend;
use tracing::info;

use crate::memory::{AdaptiveMemory, MemoryVectorStore};
use crate::{SDKConfig, SDKResult};

/// Mnemo SDK - Main entry point
///
/// # Example
///
/// ```rust,no_run
/// use mnemo_sdk::{SDK, SDKConfig, SearchRequest};
///
/// async fn example() -> anyhow::Result<()> {
///     let mut sdk = SDK::new(SDKConfig::default().with_snapshot("patterns.json"))?;
///     sdk.initialize().await?;
///
///     let results = sdk.memory().search(SearchRequest::new(vec![1.0, 0.0], 10)).await?;
///
///     sdk.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct SDK {
    /// SDK configuration
    config: SDKConfig,

    /// Adaptive memory over the vector store
    memory: AdaptiveMemory,

    /// Whether the SDK has been initialized
    initialized: bool,
}

impl SDK {
    /// Create an SDK backed by the in-memory vector store
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: SDKConfig) -> SDKResult<Self> {
        Self::with_backend(config, Arc::new(MemoryVectorStore::new()))
    }

    /// Create an SDK over a caller-provided vector store
    pub fn with_backend(config: SDKConfig, backend: Arc<dyn GraphBackend>) -> SDKResult<Self> {
        config.validate()?;

        let memory = AdaptiveMemory::new(backend, &config);

        Ok(Self {
            config,
            memory,
            initialized: false,
        })
    }

    /// Initialize the SDK
    ///
    /// Loads the pattern snapshot when one is configured and present.
    pub async fn initialize(&mut self) -> SDKResult<()> {
        if self.initialized {
            return Ok(());
        }

        if let Some(path) = &self.config.snapshot_path {
            if tokio::fs::try_exists(path).await? {
                self.memory.load_patterns(path).await?;
            } else {
                info!("No pattern snapshot at {}, starting empty", path.display());
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Shutdown the SDK
    ///
    /// Saves the pattern snapshot when one is configured.
    pub async fn shutdown(&mut self) -> SDKResult<()> {
        if !self.initialized {
            return Ok(());
        }

        if let Some(path) = &self.config.snapshot_path {
            self.memory.save_patterns(path).await?;
        }

        self.initialized = false;
        Ok(())
    }

    /// Check if the SDK is initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the SDK configuration
    pub fn config(&self) -> &SDKConfig {
        &self.config
    }

    /// Get the adaptive memory
    pub fn memory(&self) -> &AdaptiveMemory {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Interaction, Selection};
    use mnemo_core::PatternConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sdk_creation() {
        let sdk = SDK::new(SDKConfig::default());
        assert!(sdk.is_ok());

        let sdk = sdk.unwrap();
        assert!(!sdk.is_initialized());
        assert!(sdk.config().snapshot_path.is_none());
    }

    #[tokio::test]
    async fn test_sdk_validation() {
        let mut config = SDKConfig::default();
        config.graph.similarity_threshold = 2.0;
        assert!(SDK::new(config).is_err());
    }

    #[tokio::test]
    async fn test_snapshot_survives_restart() {
        let dir = TempDir::new().unwrap();
        let config = SDKConfig::default()
            .with_patterns(PatternConfig {
                quality_threshold: 0.5,
                min_samples_per_cluster: 1,
                max_clusters: 2,
            })
            .with_snapshot(dir.path().join("patterns.json"));

        let mut sdk = SDK::new(config.clone()).unwrap();
        sdk.initialize().await.unwrap();
        sdk.memory()
            .record_interaction(Interaction {
                query_id: "q".to_string(),
                query_vector: vec![1.0, 0.0],
                selections: vec![Selection {
                    result_id: "r".to_string(),
                    result_vector: vec![1.0, 0.0],
                    relevance_score: 0.9,
                }],
            })
            .await;
        sdk.shutdown().await.unwrap();

        let mut restored = SDK::new(config).unwrap();
        restored.initialize().await.unwrap();
        assert!(restored.is_initialized());
        assert_eq!(restored.memory().pattern_stats().await.sample_count, 1);
    }
}
