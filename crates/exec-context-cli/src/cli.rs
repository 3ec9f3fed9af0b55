//! Command-line arguments for `ctx-trace`.

use clap::Parser;
use exec_context_log::{LogSink, LoggerConfig};

/// Run a chain of nested execution scopes and print lineage-tagged lines
#[derive(Parser, Debug, Clone)]
#[command(name = "ctx-trace", version, about, long_about = None)]
pub struct TraceCli {
    /// Name of the root scope
    #[arg(long, default_value = "main")]
    pub root: String,

    /// Number of nested scopes below the root
    #[arg(short, long, default_value_t = 3)]
    pub depth: usize,

    /// Run every level through `exec_async` on a tokio runtime
    #[arg(long = "async")]
    pub run_async: bool,

    /// Separator between scope names in log tags
    #[arg(long, env = "EXEC_CONTEXT_LOG_SEPARATOR")]
    pub separator: Option<String>,

    /// Log sink: console or tracing
    #[arg(long, env = "EXEC_CONTEXT_LOG_SINK")]
    pub sink: Option<LogSink>,

    /// Print a JSON report of every scope after the run
    #[arg(long)]
    pub json: bool,
}

impl TraceCli {
    /// Logger config from the defaults, overridden by the arguments
    pub fn logger_config(&self) -> LoggerConfig {
        let mut config = LoggerConfig::default();
        if let Some(separator) = &self.separator {
            config = config.with_separator(separator.clone());
        }
        if let Some(sink) = self.sink {
            config = config.with_sink(sink);
        }
        config
    }
}
