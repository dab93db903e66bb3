//! Rerank command: reorder a result list using learned patterns.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use mnemo_core::types::SearchResult;
use mnemo_core::RerankMode;
use std::collections::HashMap;
use std::path::Path;

use super::open_sdk;
use crate::cli::RerankArgs;
use crate::config::Config;

/// Execute rerank command.
pub async fn execute(args: RerankArgs, config: &Config, snapshot: &Path) -> Result<()> {
    let results = read_results(&args.results).await?;
    let mode = args.mode.map(RerankMode::from).unwrap_or(config.rerank.mode);

    if let Some(boost) = args.boost {
        if !(0.0..=1.0).contains(&boost) {
            bail!("Boost must be between 0 and 1, got {}", boost);
        }
    }

    let before: HashMap<String, (usize, f32)> = results
        .iter()
        .enumerate()
        .map(|(rank, r)| (r.id().to_string(), (rank + 1, r.score)))
        .collect();

    let sdk = open_sdk(config, snapshot).await?;
    let reranked = sdk
        .memory()
        .rerank(results, &args.vector, args.boost, mode)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reranked)?);
        return Ok(());
    }

    if reranked.is_empty() {
        println!("{} No results to rerank", "⚠".yellow());
        return Ok(());
    }

    for (i, result) in reranked.iter().enumerate() {
        let (old_rank, old_score) = before.get(result.id()).copied().unwrap_or((i + 1, result.score));
        let movement = match old_rank.cmp(&(i + 1)) {
            std::cmp::Ordering::Greater => format!("▲{}", old_rank - (i + 1)).green(),
            std::cmp::Ordering::Less => format!("▼{}", (i + 1) - old_rank).red(),
            std::cmp::Ordering::Equal => "=".dimmed(),
        };
        println!(
            "{:>3}. {} {:.3} (was {:.3}) {}",
            i + 1,
            result.id().cyan(),
            result.score,
            old_score,
            movement
        );
    }

    Ok(())
}

/// Read a JSON array of search results.
async fn read_results(path: &Path) -> Result<Vec<SearchResult>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse results in {}", path.display()))
}
