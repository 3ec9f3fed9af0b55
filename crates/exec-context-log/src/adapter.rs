//! Derives loggers from scope lineage.

use exec_context_core::Context;

use crate::config::DEFAULT_SEPARATOR;
use crate::logger::ConsoleLogger;

/// Builds loggers named after a scope's lineage, e.g. `main-funcA-funcB`.
///
/// Only reads the lineage, so it works on stopped scopes too.
pub struct ContextLogger;

impl ContextLogger {
    /// Console logger tagged with the lineage joined by `-`
    pub fn from_context(context: &Context) -> ConsoleLogger {
        Self::from_context_with(context, DEFAULT_SEPARATOR)
    }

    pub fn from_context_with(context: &Context, separator: &str) -> ConsoleLogger {
        ConsoleLogger::new(Self::tag(context, separator))
    }

    /// Lineage joined by `separator`
    pub fn tag(context: &Context, separator: &str) -> String {
        context.names().join(separator)
    }
}
