//! ctx-trace CLI
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: A scope lifecycle assertion failed or the runtime could not start

use clap::Parser;
use exec_context_cli::{run, TraceCli};

fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let cli = TraceCli::parse();
    let report = run(&cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
