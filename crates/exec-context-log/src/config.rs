//! Logger configuration.

use exec_context_core::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::adapter::ContextLogger;
use crate::logger::{Logger, TracingLogger};

/// Default separator between scope names in a logger tag
pub const DEFAULT_SEPARATOR: &str = "-";

/// Environment variable overriding the tag separator
pub const ENV_SEPARATOR: &str = "EXEC_CONTEXT_LOG_SEPARATOR";

/// Environment variable selecting the sink (`console` or `tracing`)
pub const ENV_SINK: &str = "EXEC_CONTEXT_LOG_SINK";

/// Where derived loggers write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    /// Standard output
    #[default]
    Console,
    /// `tracing` events
    Tracing,
}

/// Unknown sink name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown log sink '{0}', expected 'console' or 'tracing'")]
pub struct ParseSinkError(String);

impl FromStr for LogSink {
    type Err = ParseSinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "stdout" => Ok(LogSink::Console),
            "tracing" => Ok(LogSink::Tracing),
            other => Err(ParseSinkError(other.to_string())),
        }
    }
}

impl fmt::Display for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Console => write!(f, "console"),
            LogSink::Tracing => write!(f, "tracing"),
        }
    }
}

/// How loggers are derived from scopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Joins the scope lineage into the logger name
    pub separator: String,

    /// Sink for derived loggers
    pub sink: LogSink,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            sink: LogSink::default(),
        }
    }
}

impl LoggerConfig {
    /// Create config from environment variables
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            separator: lookup(ENV_SEPARATOR)
                .filter(|sep| !sep.is_empty())
                .unwrap_or(defaults.separator),
            sink: lookup(ENV_SINK)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sink),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Logger tagged with `context`'s lineage, writing to the configured sink
    pub fn logger_for(&self, context: &Context) -> Arc<dyn Logger> {
        match self.sink {
            LogSink::Console => Arc::new(ContextLogger::from_context_with(context, &self.separator)),
            LogSink::Tracing => Arc::new(TracingLogger::new(ContextLogger::tag(
                context,
                &self.separator,
            ))),
        }
    }
}
