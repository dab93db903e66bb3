//! mnemo - Adaptive memory CLI
//!
//! Maintains a pattern snapshot learned from relevance feedback and uses it
//! to rerank vector search results.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;
mod progress;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("mnemo=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load()?;
    let snapshot = cli.snapshot.unwrap_or_else(|| config.snapshot_path());

    // Execute command
    match cli.command {
        Commands::Patterns(cmd) => commands::patterns::execute(cmd, &config, &snapshot).await,
        Commands::Rerank(args) => commands::rerank::execute(args, &config, &snapshot).await,
        Commands::Version => {
            println!("mnemo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
