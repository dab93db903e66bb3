//! Command implementations for mnemo CLI.
//!
//! Each submodule implements the logic for a command group.

pub mod patterns;
pub mod rerank;

use anyhow::{Context, Result};
use mnemo_sdk::SDK;
use std::path::Path;
use tracing::debug;

use crate::config::Config;

/// Open the SDK over the snapshot at `snapshot`, loading it when present.
pub(crate) async fn open_sdk(config: &Config, snapshot: &Path) -> Result<SDK> {
    debug!("Using pattern snapshot {}", snapshot.display());
    let mut sdk = SDK::new(config.sdk_config(snapshot.to_path_buf()))
        .context("Failed to create SDK")?;
    sdk.initialize()
        .await
        .with_context(|| format!("Failed to load pattern snapshot {}", snapshot.display()))?;
    Ok(sdk)
}

/// Persist pattern state back to the snapshot.
pub(crate) async fn close_sdk(mut sdk: SDK) -> Result<()> {
    sdk.shutdown().await.context("Failed to save pattern snapshot")
}
