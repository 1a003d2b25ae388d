//! Spotify ML - Main Entry Point
//!
//! Trains and evaluates the chart classifier from the command line.

use clap::Parser;
use spotify_ml::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotify_ml=info".into()),
        )
        .init();

    run(Cli::parse())
}
