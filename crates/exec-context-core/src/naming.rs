//! Scope name derivation for guarded execution.
//!
//! A child scope created by `exec` is named, in order of preference, by an
//! explicit label, by the identifier of the callable it runs, or by a
//! generated `anonymous#N` label.

use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of generated scope names
pub const ANONYMOUS_PREFIX: &str = "anonymous#";

/// Source of a scope name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeLabel {
    /// Caller-supplied name
    Explicit(String),
    /// Type name of the callable, as reported by `std::any::type_name`
    Callable(&'static str),
    /// No name available; one is generated
    Anonymous,
}

impl ScopeLabel {
    /// Label derived from the callable's type.
    pub fn of<F>(_callable: &F) -> Self {
        ScopeLabel::Callable(std::any::type_name::<F>())
    }

    /// Resolve the label to a concrete scope name.
    pub fn resolve(&self, counter: &AnonymousCounter) -> String {
        match self {
            ScopeLabel::Explicit(name) => name.clone(),
            ScopeLabel::Callable(type_name) => {
                callable_name(type_name).unwrap_or_else(|| counter.next_label())
            }
            ScopeLabel::Anonymous => counter.next_label(),
        }
    }
}

impl From<&str> for ScopeLabel {
    fn from(name: &str) -> Self {
        ScopeLabel::Explicit(name.to_string())
    }
}

impl From<String> for ScopeLabel {
    fn from(name: String) -> Self {
        ScopeLabel::Explicit(name)
    }
}

/// Type names of callables that carry no identifier of their own.
const UNNAMED_PREFIXES: &[&str] = &[
    "fn(",
    "unsafe ",
    "extern ",
    "dyn ",
    "&",
    "*",
    "(",
    "[",
    "alloc::boxed::Box<",
    "alloc::sync::Arc<",
    "alloc::rc::Rc<",
];

/// Identifier of a named function, `None` for closures and other unnamed types.
fn callable_name(type_name: &str) -> Option<String> {
    if type_name.contains("{{closure}}")
        || UNNAMED_PREFIXES
            .iter()
            .any(|prefix| type_name.starts_with(prefix))
    {
        return None;
    }
    let base = strip_generics(type_name);
    base.trim_end_matches("::")
        .rsplit("::")
        .next()
        .filter(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_')
        })
        .map(str::to_string)
}

/// Drop every `<...>` group, nested ones included.
fn strip_generics(type_name: &str) -> String {
    let mut depth = 0usize;
    let mut prev = ' ';
    type_name
        .chars()
        .filter(|&c| {
            let keep = match c {
                '<' => {
                    depth += 1;
                    false
                }
                // `->` inside a fn signature is not a closing bracket
                '>' if depth > 0 && prev != '-' => {
                    depth -= 1;
                    false
                }
                _ => depth == 0,
            };
            prev = c;
            keep
        })
        .collect()
}

/// Counter behind generated scope names.
///
/// Starts at zero when the process starts. Only guarantees that generated
/// names are unique within the process.
#[derive(Debug)]
pub struct AnonymousCounter {
    next: AtomicU64,
}

impl AnonymousCounter {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Produce the next `anonymous#N` label
    pub fn next_label(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}", ANONYMOUS_PREFIX, n)
    }

    /// Number of labels generated so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for AnonymousCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide counter used by `Context::exec` and friends
pub static ANONYMOUS_NAMES: AnonymousCounter = AnonymousCounter::new();
