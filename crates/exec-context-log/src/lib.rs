//! Lineage-tagged logging for execution scopes.
//!
//! Loggers built here are named after a scope's lineage, so a line written
//! from `funcB` called by `funcA` called by `main` reads
//! `main-funcA-funcB: ...`.
//!
//! # Usage
//!
//! ```rust
//! use exec_context_log::{log_line, LoggedContext};
//!
//! let main = LoggedContext::new("main");
//! main.exec(|ctx| log_line!(ctx, "answer is {}", 42)).unwrap();
//! ```
//!
//! - [`Logger`] is the sink capability; [`ConsoleLogger`] writes to stdout,
//!   [`TracingLogger`] emits `tracing` events.
//! - [`ContextLogger`] derives a logger from any [`Context`](exec_context_core::Context).
//! - [`LoggedContext`] keeps a logger attached to a scope and its children.
//! - [`LoggerConfig`] picks the separator and sink, optionally from the environment.

pub mod adapter;
pub mod config;
pub mod logged;
pub mod logger;

pub use adapter::ContextLogger;
pub use config::{LogSink, LoggerConfig, ParseSinkError};
pub use logged::LoggedContext;
pub use logger::{ConsoleLogger, Logger, TracingLogger};
