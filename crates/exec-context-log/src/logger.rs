//! Logger capability and its sinks.

use std::fmt;

/// A named sink for log lines.
///
/// Implementors only write; formatting is shared through
/// [`format_line`](Logger::format_line).
pub trait Logger: Send + Sync {
    /// Display name used to tag every line
    fn name(&self) -> &str;

    /// Emit one message
    fn log(&self, message: &str);

    /// `name: message`
    fn format_line(&self, message: &str) -> String {
        format!("{}: {}", self.name(), message)
    }
}

/// Format the arguments and pass them to a logger's `log`.
///
/// ```rust
/// use exec_context_log::{log_line, ConsoleLogger};
///
/// let logger = ConsoleLogger::new("main-funcA");
/// log_line!(logger, "processed {} items", 30);
/// ```
#[macro_export]
macro_rules! log_line {
    ($logger:expr, $($arg:tt)+) => {{
        #[allow(unused_imports)]
        use $crate::Logger as _;
        $logger.log(&::std::format!($($arg)+))
    }};
}

/// Writes lines to standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLogger {
    name: String,
}

impl ConsoleLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Logger for ConsoleLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, message: &str) {
        println!("{}", self.format_line(message));
    }
}

/// Emits lines as `INFO` events through `tracing`, tagged with a `scope` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, message: &str) {
        tracing::info!(scope = %self.name, "{}", message);
    }
}

impl fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name()).finish()
    }
}
