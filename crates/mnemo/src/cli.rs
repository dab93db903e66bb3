//! CLI argument definitions using clap derive macros.
//!
//! Command structure for pattern snapshot maintenance and reranking.

use clap::{Args, Parser, Subcommand, ValueEnum};
use mnemo_core::RerankMode;
use std::path::PathBuf;

/// Mnemo - adaptive memory CLI
///
/// Learns query patterns from relevance feedback and uses them to rerank
/// vector search results.
#[derive(Parser, Debug)]
#[command(name = "mnemo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Pattern snapshot file (overrides the configured path)
    #[arg(long, global = true, env = "MNEMO_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pattern store management (ingest, cluster, similar, feedback)
    Patterns(PatternsCommand),

    /// Rerank a result list with learned patterns
    Rerank(RerankArgs),

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct PatternsCommand {
    #[command(subcommand)]
    pub action: PatternsAction,
}

#[derive(Subcommand, Debug)]
pub enum PatternsAction {
    /// Ingest samples from a JSON Lines file
    Ingest {
        /// One sample per line: {"query_vector": [..], "result_vector": [..], "relevance_score": 0.8}
        file: PathBuf,

        /// Run a cluster pass after ingesting
        #[arg(long)]
        cluster: bool,
    },

    /// Rebuild clusters from every stored sample
    Cluster,

    /// Show the patterns closest to a vector
    Similar {
        /// Comma-separated vector components
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        vector: Vec<f32>,

        /// Number of patterns to show
        #[arg(short, default_value = "5")]
        k: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Revise the relevance score of a sample
    Feedback {
        /// Sample ID
        sample_id: String,

        /// New relevance score (clamped to 0..1)
        score: f32,
    },

    /// Show pattern store statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the pattern snapshot to a file
    Export {
        /// Output file
        out: PathBuf,
    },

    /// Replace the pattern snapshot with a file's contents
    Import {
        /// Snapshot file written by `export`
        file: PathBuf,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Rerank Command
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct RerankArgs {
    /// JSON array of search results: [{"entry": {"id": .., "vector": [..]}, "score": 0.7}]
    pub results: PathBuf,

    /// Comma-separated query vector components
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub vector: Vec<f32>,

    /// Pattern boost (0..1); defaults to the configured value
    #[arg(long)]
    pub boost: Option<f32>,

    /// Vector matched against patterns
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Match each result's own vector
    Result,
    /// Match the query vector
    Query,
}

impl From<ModeArg> for RerankMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Result => RerankMode::ResultVector,
            ModeArg::Query => RerankMode::QueryVector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_similar_with_negative_components() {
        let cli = Cli::try_parse_from(["mnemo", "patterns", "similar", "--vector", "-1,0.5,0", "-k", "3"])
            .unwrap();

        let Commands::Patterns(PatternsCommand {
            action: PatternsAction::Similar { vector, k, json },
        }) = cli.command
        else {
            panic!("expected patterns similar");
        };
        assert_eq!(vector, vec![-1.0, 0.5, 0.0]);
        assert_eq!(k, 3);
        assert!(!json);
    }

    #[test]
    fn test_parse_rerank() {
        let cli = Cli::try_parse_from([
            "mnemo", "--snapshot", "/tmp/p.json", "rerank", "results.json", "--vector", "1,0",
            "--boost", "0.5", "--mode", "query",
        ])
        .unwrap();

        assert_eq!(cli.snapshot, Some(PathBuf::from("/tmp/p.json")));
        let Commands::Rerank(args) = cli.command else {
            panic!("expected rerank");
        };
        assert_eq!(args.boost, Some(0.5));
        assert_eq!(args.mode.map(RerankMode::from), Some(RerankMode::QueryVector));
    }
}
