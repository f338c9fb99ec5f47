//! Binary crate for the `simple-weather` status indicator.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration prompts
//! - Writing indicator updates to stdout for a status bar

use clap::Parser;

mod cli;
mod indicator;
mod prompt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.debug);
    cmd.run().await
}

/// Logs go to stderr; stdout carries the indicator.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
