//! Configuration management for mnemo.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Command line flags (`--snapshot`)
//! 2. Config file (`$MNEMO_CONFIG`, or `config.toml` in the data directory)
//! 3. Default values

use anyhow::{Context, Result};
use directories::ProjectDirs;
use mnemo_core::{PatternConfig, RerankMode, DEFAULT_PATTERN_BOOST};
use mnemo_sdk::{SDKConfig, SearchConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pattern store settings
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Rerank defaults
    #[serde(default)]
    pub rerank: RerankConfig,

    /// Paths
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankConfig {
    /// Boost used when `--boost` is not given
    #[serde(default = "default_pattern_boost")]
    pub pattern_boost: f32,

    /// Vector matched against patterns
    #[serde(default)]
    pub mode: RerankMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for mnemo data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Pattern snapshot; defaults to `patterns.json` in the data directory
    pub snapshot: Option<PathBuf>,
}

fn default_pattern_boost() -> f32 {
    DEFAULT_PATTERN_BOOST
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "mnemo", "mnemo") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mnemo")
    }
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            pattern_boost: default_pattern_boost(),
            mode: RerankMode::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot: None,
        }
    }
}

impl Config {
    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config
            .sdk_config(config.snapshot_path())
            .validate()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("MNEMO_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// Pattern snapshot location.
    pub fn snapshot_path(&self) -> PathBuf {
        self.paths
            .snapshot
            .clone()
            .unwrap_or_else(|| self.paths.data_dir.join("patterns.json"))
    }

    /// SDK configuration persisting patterns at `snapshot`.
    pub fn sdk_config(&self, snapshot: PathBuf) -> SDKConfig {
        SDKConfig::default()
            .with_patterns(self.patterns.clone())
            .with_search(SearchConfig {
                default_pattern_boost: self.rerank.pattern_boost,
                ..Default::default()
            })
            .with_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.patterns.quality_threshold, 0.5);
        assert_eq!(config.patterns.min_samples_per_cluster, 3);
        assert_eq!(config.patterns.max_clusters, 10);
        assert_eq!(config.rerank.pattern_boost, 0.2);
        assert_eq!(config.rerank.mode, RerankMode::ResultVector);
        assert!(config.snapshot_path().ends_with("patterns.json"));
    }

    #[test]
    fn test_load_partial_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[patterns]
max_clusters = 4

[rerank]
mode = "query_vector"

[paths]
data_dir = "/var/lib/mnemo"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(config.patterns.max_clusters, 4);
        assert_eq!(config.patterns.min_samples_per_cluster, 3);
        assert_eq!(config.rerank.mode, RerankMode::QueryVector);
        assert_eq!(config.rerank.pattern_boost, 0.2);
        assert_eq!(config.snapshot_path(), PathBuf::from("/var/lib/mnemo/patterns.json"));
    }

    #[test]
    fn test_load_nonexistent_uses_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&temp.path().join("missing.toml")).unwrap();
        assert_eq!(config.patterns.max_clusters, 10);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[patterns]\nmin_samples_per_cluster = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_sdk_config_carries_settings() {
        let mut config = Config::default();
        config.rerank.pattern_boost = 0.4;

        let sdk = config.sdk_config(PathBuf::from("/tmp/p.json"));
        assert_eq!(sdk.search.default_pattern_boost, 0.4);
        assert_eq!(sdk.snapshot_path, Some(PathBuf::from("/tmp/p.json")));
    }
}
