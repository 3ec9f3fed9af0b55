//! `ctx-trace`: runs a nested chain of execution scopes and prints
//! lineage-tagged output.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Three levels below "main", printed to stdout
//! ctx-trace --depth 3
//!
//! # Same chain through exec_async, tags joined with "."
//! ctx-trace --depth 3 --async --separator .
//!
//! # Route lines through tracing and dump a JSON report
//! ctx-trace --sink tracing --json
//! ```

pub mod cli;
pub mod trace;

pub use cli::TraceCli;
pub use trace::{run_async, run_sync, TraceReport};

use anyhow::Context as _;

/// Run the chain described by `cli`
pub fn run(cli: &TraceCli) -> anyhow::Result<TraceReport> {
    let config = cli.logger_config();
    tracing::debug!(
        root = %cli.root,
        depth = cli.depth,
        run_async = cli.run_async,
        separator = %config.separator,
        sink = %config.sink,
        "starting trace"
    );

    if cli.run_async {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;
        Ok(runtime.block_on(run_async(&cli.root, cli.depth, config))?)
    } else {
        Ok(run_sync(&cli.root, cli.depth, config)?)
    }
}
