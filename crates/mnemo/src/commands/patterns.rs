//! Pattern store commands.
//!
//! Every command loads the pattern snapshot, applies its change, and writes
//! the snapshot back only when something changed.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use mnemo_core::types::{Pattern, Sample};
use mnemo_core::IngestOutcome;
use serde::Deserialize;
use std::path::Path;

use super::{close_sdk, open_sdk};
use crate::cli::{PatternsAction, PatternsCommand};
use crate::config::Config;
use crate::progress::create_progress_bar;

/// Execute patterns command.
pub async fn execute(cmd: PatternsCommand, config: &Config, snapshot: &Path) -> Result<()> {
    match cmd.action {
        PatternsAction::Ingest { file, cluster } => ingest(&file, cluster, config, snapshot).await,
        PatternsAction::Cluster => cluster(config, snapshot).await,
        PatternsAction::Similar { vector, k, json } => {
            similar(&vector, k, json, config, snapshot).await
        }
        PatternsAction::Feedback { sample_id, score } => {
            feedback(&sample_id, score, config, snapshot).await
        }
        PatternsAction::Stats { json } => stats(json, config, snapshot).await,
        PatternsAction::Export { out } => export(&out, config, snapshot).await,
        PatternsAction::Import { file } => import(&file, config, snapshot).await,
    }
}

/// One line of an ingest file.
#[derive(Debug, Deserialize)]
struct SampleRecord {
    id: Option<String>,
    query_vector: Vec<f32>,
    #[serde(default)]
    result_vector: Vec<f32>,
    relevance_score: f32,
    timestamp: Option<i64>,
}

impl From<SampleRecord> for Sample {
    fn from(record: SampleRecord) -> Self {
        let mut sample = Sample::new(record.query_vector, record.result_vector, record.relevance_score);
        if let Some(id) = record.id {
            sample = sample.with_id(id);
        }
        if let Some(timestamp) = record.timestamp {
            sample.timestamp = timestamp;
        }
        sample
    }
}

/// Tally of ingest outcomes.
#[derive(Debug, Default, PartialEq, Eq)]
struct IngestSummary {
    accepted: usize,
    below_threshold: usize,
    invalid_vector: usize,
    duplicate: usize,
    cluster_passes: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::Accepted { reclustered } => {
                self.accepted += 1;
                if reclustered {
                    self.cluster_passes += 1;
                }
            }
            IngestOutcome::BelowThreshold => self.below_threshold += 1,
            IngestOutcome::EmptyVector | IngestOutcome::DimensionMismatch { .. } => {
                self.invalid_vector += 1
            }
            IngestOutcome::Duplicate => self.duplicate += 1,
        }
    }
}

/// Parse a JSON Lines sample file, skipping blank lines.
fn parse_samples(content: &str) -> Result<Vec<Sample>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<SampleRecord>(line)
                .map(Sample::from)
                .with_context(|| format!("Invalid sample on line {}", i + 1))
        })
        .collect()
}

/// Ingest samples from a JSON Lines file.
async fn ingest(file: &Path, run_cluster: bool, config: &Config, snapshot: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let samples = parse_samples(&content)?;

    let sdk = open_sdk(config, snapshot).await?;
    let memory = sdk.memory();

    let pb = create_progress_bar(samples.len() as u64, "Ingesting samples");
    let mut summary = IngestSummary::default();
    for sample in samples {
        summary.record(memory.add_sample(sample).await);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if run_cluster {
        memory.cluster().await;
        summary.cluster_passes += 1;
    }

    let stats = memory.pattern_stats().await;
    close_sdk(sdk).await?;

    println!("{} Ingested {} samples", "✓".green(), summary.accepted);
    if summary.below_threshold > 0 {
        println!("  Below threshold: {}", summary.below_threshold);
    }
    if summary.invalid_vector > 0 {
        println!("  Invalid vectors: {}", summary.invalid_vector);
    }
    if summary.duplicate > 0 {
        println!("  Duplicate ids: {}", summary.duplicate);
    }
    println!(
        "  Cluster passes: {}  Patterns: {}",
        summary.cluster_passes,
        stats.cluster_count.to_string().cyan()
    );

    Ok(())
}

/// Rebuild clusters from every stored sample.
async fn cluster(config: &Config, snapshot: &Path) -> Result<()> {
    let sdk = open_sdk(config, snapshot).await?;
    let count = sdk.memory().cluster().await;
    let stats = sdk.memory().pattern_stats().await;
    close_sdk(sdk).await?;

    if count == 0 {
        println!(
            "{} Not enough samples to cluster ({} stored, {} needed)",
            "⚠".yellow(),
            stats.sample_count,
            config.patterns.min_samples_per_cluster
        );
    } else {
        println!(
            "{} Clustered {} samples into {} patterns",
            "✓".green(),
            stats.sample_count,
            count.to_string().cyan()
        );
    }

    Ok(())
}

/// Show the patterns closest to a vector.
async fn similar(vector: &[f32], k: usize, json: bool, config: &Config, snapshot: &Path) -> Result<()> {
    let sdk = open_sdk(config, snapshot).await?;
    let patterns = sdk.memory().find_patterns(vector, k).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
        return Ok(());
    }

    if patterns.is_empty() {
        println!("{} No patterns learned yet", "⚠".yellow());
        return Ok(());
    }

    println!("{} Found {} patterns:", "✓".green(), patterns.len());
    println!();
    for (i, pattern) in patterns.iter().enumerate() {
        print_pattern(i + 1, pattern);
    }

    Ok(())
}

/// Revise the relevance score of a sample.
async fn feedback(sample_id: &str, score: f32, config: &Config, snapshot: &Path) -> Result<()> {
    if !score.is_finite() {
        bail!("Score must be a number, got {}", score);
    }

    let sdk = open_sdk(config, snapshot).await?;
    if !sdk.memory().update_feedback(sample_id, score).await {
        bail!("Sample not found: {}", sample_id);
    }
    close_sdk(sdk).await?;

    println!(
        "{} Updated {} to {:.2}",
        "✓".green(),
        sample_id,
        score.clamp(0.0, 1.0)
    );
    Ok(())
}

/// Show pattern store statistics.
async fn stats(json: bool, config: &Config, snapshot: &Path) -> Result<()> {
    let sdk = open_sdk(config, snapshot).await?;
    let stats = sdk.memory().pattern_stats().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Pattern Store".bold());
    println!("  Snapshot:         {}", snapshot.display());
    println!("  Samples:          {}", stats.sample_count);
    println!("  Patterns:         {}", stats.cluster_count);
    println!("  Since last pass:  {}", stats.pending_samples);
    println!("  Mean quality:     {:.3}", stats.mean_cluster_quality);

    Ok(())
}

/// Write the pattern snapshot to a file.
async fn export(out: &Path, config: &Config, snapshot: &Path) -> Result<()> {
    let sdk = open_sdk(config, snapshot).await?;
    sdk.memory()
        .save_patterns(out)
        .await
        .with_context(|| format!("Failed to export to {}", out.display()))?;

    println!("{} Exported patterns to {}", "✓".green(), out.display());
    Ok(())
}

/// Replace the pattern snapshot with a file's contents.
async fn import(file: &Path, config: &Config, snapshot: &Path) -> Result<()> {
    let sdk = open_sdk(config, snapshot).await?;
    sdk.memory()
        .load_patterns(file)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let stats = sdk.memory().pattern_stats().await;
    close_sdk(sdk).await?;

    println!(
        "{} Imported {} samples and {} patterns",
        "✓".green(),
        stats.sample_count,
        stats.cluster_count
    );
    Ok(())
}

fn print_pattern(index: usize, pattern: &Pattern) {
    println!(
        "{}. {} {}",
        index,
        pattern.id.dimmed(),
        format!("similarity {:.3}", pattern.similarity).cyan()
    );
    println!(
        "   Samples: {}  Quality: {:.3}",
        pattern.cluster_size, pattern.avg_quality
    );
    println!();
}
