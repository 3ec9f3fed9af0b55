//! Hierarchical execution scopes for instrumenting nested units of work.
//!
//! This crate provides scopes ("contexts") that carry inheritable key-value
//! state and bracket synchronous or asynchronous work with a traceable
//! lifetime, e.g. `main → funcA → funcB`.
//!
//! # Scope Hierarchy
//!
//! ```text
//! main (root)
//!   └─ funcA      reads fall through to main
//!       └─ funcB  writes go to whichever scope owns the key
//! ```
//!
//! # Usage
//!
//! 1. Create a root with [`Context::new`].
//! 2. Enter children manually with [`Context::enter`] / [`Context::leave`], or
//!    let [`Context::exec`] and [`Context::exec_async`] manage them.
//! 3. Read and write with [`Context::get`] and [`Context::set`].
//! 4. Use [`ContextRegistry`] to find scopes again by key.

pub mod assert;
pub mod context;
pub mod data;
pub mod error;
pub mod guard;
pub mod naming;
pub mod registry;
pub mod snapshot;

pub use assert::AssertionError;
pub use context::{Context, ContextStatus, ExecOptions, RESULT_KEY};
pub use data::ScopeData;
pub use error::{Result, ScopeError};
pub use guard::{LeaveGuard, ScopedFuture};
pub use naming::{AnonymousCounter, ScopeLabel, ANONYMOUS_NAMES};
pub use registry::ContextRegistry;
pub use snapshot::ContextSnapshot;
