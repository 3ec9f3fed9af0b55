//! Hierarchical execution scopes.
//!
//! A [`Context`] is a named scope with a local key-value map, an optional
//! parent and a started/stopped lifecycle. Reads fall through to ancestors;
//! writes go to the nearest scope that already owns the key, so each key has
//! a single source of truth across the chain.
//!
//! # Example
//!
//! ```rust
//! use exec_context_core::Context;
//! use serde_json::json;
//!
//! let main = Context::new("main");
//! main.set("x", 1);
//!
//! let child = main.enter("child").unwrap();
//! child.set("x", 2);
//! assert_eq!(main.get("x"), Some(json!(2)));
//!
//! let answer = main.exec(|_ctx| 41).unwrap();
//! assert_eq!(answer, 41);
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::assert::{self, AssertionError};
use crate::data::ScopeData;
use crate::error::ScopeError;
use crate::guard::{LeaveGuard, ScopedFuture};
use crate::naming::{ScopeLabel, ANONYMOUS_NAMES};
use crate::snapshot::ContextSnapshot;

/// Key under which the `*_capture` variants store the callable's result
pub const RESULT_KEY: &str = "exec$result";

/// Lifecycle state of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStatus {
    Started,
    Stopped,
}

impl fmt::Display for ContextStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextStatus::Started => write!(f, "started"),
            ContextStatus::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Lifecycle {
    status: ContextStatus,
    ended_at: Option<DateTime<Utc>>,
}

struct ContextInner {
    id: Uuid,
    name: String,
    parent: Option<Context>,
    data: ScopeData,
    started_at: DateTime<Utc>,
    lifecycle: Mutex<Lifecycle>,
}

/// Handle to an execution scope.
///
/// Clones are cheap and refer to the same scope; equality is identity.
/// A child keeps its parent alive, parents never reference their children.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

/// Options for the child scope created by `exec` and `exec_async`.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    name: Option<String>,
    data: Option<ScopeData>,
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with an explicit child name
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Use `data` as the child's local map instead of a fresh one
    pub fn with_data(mut self, data: ScopeData) -> Self {
        self.data = Some(data);
        self
    }

    /// Resolve the child's name and data.
    ///
    /// `fallback` is used when no explicit name was set.
    pub fn into_parts(self, fallback: ScopeLabel) -> (String, ScopeData) {
        let label = self.name.map(ScopeLabel::Explicit).unwrap_or(fallback);
        (label.resolve(&ANONYMOUS_NAMES), self.data.unwrap_or_default())
    }
}

impl Context {
    /// Create a started root scope with an empty map
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), ScopeData::new(), None)
    }

    /// Create a started root scope seeded with `data`
    pub fn with_data(name: impl Into<String>, data: ScopeData) -> Self {
        Self::build(name.into(), data, None)
    }

    fn build(name: String, data: ScopeData, parent: Option<Context>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: Uuid::new_v4(),
                name,
                parent,
                data,
                started_at: Utc::now(),
                lifecycle: Mutex::new(Lifecycle {
                    status: ContextStatus::Started,
                    ended_at: None,
                }),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&Context> {
        self.inner.parent.as_ref()
    }

    /// This scope's local map
    pub fn data(&self) -> &ScopeData {
        &self.inner.data
    }

    pub fn status(&self) -> ContextStatus {
        self.lifecycle().status
    }

    pub fn is_started(&self) -> bool {
        self.status() == ContextStatus::Started
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle().ended_at
    }

    /// Time spent in the scope, up to now if it is still started
    pub fn elapsed(&self) -> chrono::Duration {
        self.ended_at().unwrap_or_else(Utc::now) - self.inner.started_at
    }

    /// Scope names from the root down to this scope.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .ancestors()
            .map(|context| context.name().to_string())
            .collect();
        names.reverse();
        names
    }

    fn ancestors(&self) -> impl Iterator<Item = &Context> {
        std::iter::successors(Some(self), |context| context.parent())
    }

    /// Value for `key` from this scope or the nearest ancestor holding it.
    ///
    /// Presence is checked explicitly: stored `0`, `""`, `false` and `null`
    /// are returned as values.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.ancestors().find_map(|context| context.inner.data.get(key))
    }

    /// Like [`get`](Self::get), decoded into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> crate::error::Result<Option<T>> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|source| ScopeError::Decode {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Whether this scope's local map holds `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.data.contains_key(key)
    }

    /// Nearest scope, self first, whose local map holds `key`.
    pub fn owner_of(&self, key: &str) -> Option<Context> {
        self.ancestors()
            .find(|context| context.contains_key(key))
            .cloned()
    }

    /// Write `value` into the owner of `key`, or into this scope if no scope
    /// in the chain holds it yet.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        let key = key.into();
        match self.owner_of(&key) {
            Some(owner) if owner != *self => {
                tracing::trace!(
                    scope = %self.name(),
                    owner = %owner.name(),
                    key = %key,
                    "delegating write to owning scope"
                );
                owner.inner.data.insert(key, value.into());
            }
            _ => {
                self.inner.data.insert(key, value.into());
            }
        }
        self
    }

    /// Create a started child scope with a fresh map.
    pub fn enter(&self, name: impl Into<String>) -> Result<Context, AssertionError> {
        self.enter_with(name, ScopeData::new())
    }

    /// Create a started child scope using `data` as its local map.
    pub fn enter_with(
        &self,
        name: impl Into<String>,
        data: ScopeData,
    ) -> Result<Context, AssertionError> {
        self.check_started()?;
        let child = Self::build(name.into(), data, Some(self.clone()));
        tracing::trace!(scope = %child.name(), parent = %self.name(), "entered scope");
        Ok(child)
    }

    /// Stop this scope and return its parent.
    ///
    /// Fails if the scope was already stopped.
    pub fn leave(&self) -> Result<Option<Context>, AssertionError> {
        let elapsed_ms = {
            let mut lifecycle = self.lifecycle();
            assert::not_equal(
                &lifecycle.status,
                &ContextStatus::Stopped,
                Some(self.stopped_message().as_str()),
            )?;
            let now = Utc::now();
            lifecycle.ended_at = Some(now);
            lifecycle.status = ContextStatus::Stopped;
            (now - self.inner.started_at).num_milliseconds().max(0)
        };
        tracing::trace!(scope = %self.name(), elapsed_ms, "left scope");
        Ok(self.parent().cloned())
    }

    /// Run `func` inside a new child scope and return its output.
    ///
    /// The child is named after the callable when it is a named function,
    /// otherwise it gets an `anonymous#N` name. It is left exactly once
    /// whether `func` returns or panics.
    pub fn exec<F, R>(&self, func: F) -> Result<R, AssertionError>
    where
        F: FnOnce(&Context) -> R,
    {
        self.exec_with(ExecOptions::default(), func)
    }

    /// [`exec`](Self::exec) with an explicit child name and/or data.
    pub fn exec_with<F, R>(&self, options: ExecOptions, func: F) -> Result<R, AssertionError>
    where
        F: FnOnce(&Context) -> R,
    {
        let label = ScopeLabel::of(&func);
        self.exec_scoped(options, label, std::convert::identity, func)
            .map(|(_, output)| output)
    }

    /// Run a fallible `func` inside a new child scope.
    ///
    /// Errors returned by `func` reach the caller unchanged, after the child
    /// was left. A stopped parent is reported through `E`.
    pub fn try_exec<F, R, E>(&self, func: F) -> Result<R, E>
    where
        F: FnOnce(&Context) -> Result<R, E>,
        E: From<AssertionError>,
    {
        self.try_exec_with(ExecOptions::default(), func)
    }

    pub fn try_exec_with<F, R, E>(&self, options: ExecOptions, func: F) -> Result<R, E>
    where
        F: FnOnce(&Context) -> Result<R, E>,
        E: From<AssertionError>,
    {
        self.exec_with(options, func)?
    }

    /// Run `func` in a child scope, store its output under [`RESULT_KEY`] in
    /// the child, and return the stopped child.
    pub fn exec_capture<F, R>(&self, func: F) -> Result<Context, AssertionError>
    where
        F: FnOnce(&Context) -> R,
        R: Into<Value>,
    {
        let label = ScopeLabel::of(&func);
        self.exec_scoped(ExecOptions::default(), label, std::convert::identity, |ctx: &Context| {
            let output = func(ctx);
            ctx.set(RESULT_KEY, output);
        })
        .map(|(child, ())| child)
    }

    /// Guarded execution shared by every `exec` flavour.
    ///
    /// Enters a child named from `options` or `label`, turns it into the
    /// handle `func` expects with `wrap`, and leaves it once `func` returns
    /// or unwinds. Returns the handle together with `func`'s output.
    pub fn exec_scoped<S, W, F, R>(
        &self,
        options: ExecOptions,
        label: ScopeLabel,
        wrap: W,
        func: F,
    ) -> Result<(S, R), AssertionError>
    where
        W: FnOnce(Context) -> S,
        F: FnOnce(&S) -> R,
    {
        let (name, data) = options.into_parts(label);
        let child = self.enter_with(name, data)?;
        let guard = LeaveGuard::new(child.clone());
        tracing::debug!(scope = %child.name(), parent = %self.name(), "exec started");
        let scope = wrap(child);
        let output = func(&scope);
        tracing::debug!(scope = %guard.context().name(), "exec finished");
        guard.release();
        Ok((scope, output))
    }

    /// Run an asynchronous unit of work inside a new child scope.
    ///
    /// The child is created and started before this returns, so it can be
    /// inspected through [`ScopedFuture::context`] while the work is in
    /// flight. The child is left once the future completes, or when the
    /// returned future is dropped before completing.
    pub fn exec_async<F, Fut>(&self, executor: F) -> Result<ScopedFuture<Fut>, AssertionError>
    where
        F: FnOnce(Context) -> Fut,
        Fut: Future,
    {
        self.exec_async_with(ExecOptions::default(), executor)
    }

    pub fn exec_async_with<F, Fut>(
        &self,
        options: ExecOptions,
        executor: F,
    ) -> Result<ScopedFuture<Fut>, AssertionError>
    where
        F: FnOnce(Context) -> Fut,
        Fut: Future,
    {
        let label = ScopeLabel::of(&executor);
        self.exec_async_scoped(options, label, std::convert::identity, executor)
    }

    /// Async counterpart of [`exec_capture`](Self::exec_capture): resolves to
    /// the stopped child holding the output under [`RESULT_KEY`].
    pub fn exec_async_capture<F, Fut>(
        &self,
        executor: F,
    ) -> Result<impl Future<Output = Context>, AssertionError>
    where
        F: FnOnce(Context) -> Fut,
        Fut: Future,
        Fut::Output: Into<Value>,
    {
        let label = ScopeLabel::of(&executor);
        self.exec_async_scoped(
            ExecOptions::default(),
            label,
            std::convert::identity,
            move |ctx: Context| {
                let work = executor(ctx.clone());
                async move {
                    let output = work.await;
                    ctx.set(RESULT_KEY, output);
                    ctx
                }
            },
        )
    }

    /// Async counterpart of [`exec_scoped`](Self::exec_scoped).
    ///
    /// The child is entered and handed to `executor` before this returns;
    /// the returned future leaves it when the work completes or is dropped.
    pub fn exec_async_scoped<S, W, F, Fut>(
        &self,
        options: ExecOptions,
        label: ScopeLabel,
        wrap: W,
        executor: F,
    ) -> Result<ScopedFuture<Fut>, AssertionError>
    where
        W: FnOnce(Context) -> S,
        F: FnOnce(S) -> Fut,
        Fut: Future,
    {
        let (name, data) = options.into_parts(label);
        let child = self.enter_with(name, data)?;
        let guard = LeaveGuard::new(child.clone());
        tracing::debug!(scope = %child.name(), parent = %self.name(), "async exec started");
        let work = executor(wrap(child));
        Ok(ScopedFuture::new(guard, work))
    }

    /// Point-in-time view of this scope
    pub fn snapshot(&self) -> ContextSnapshot {
        let lifecycle = *self.lifecycle();
        ContextSnapshot {
            id: self.inner.id,
            parent_id: self.parent().map(Context::id),
            name: self.inner.name.clone(),
            lineage: self.names(),
            status: lifecycle.status,
            started_at: self.inner.started_at,
            ended_at: lifecycle.ended_at,
            duration_ms: lifecycle
                .ended_at
                .map(|end| (end - self.inner.started_at).num_milliseconds().max(0) as u64),
            data: self.inner.data.to_map(),
        }
    }

    fn check_started(&self) -> Result<(), AssertionError> {
        assert::not_equal(
            &self.status(),
            &ContextStatus::Stopped,
            Some(self.stopped_message().as_str()),
        )
    }

    fn stopped_message(&self) -> String {
        format!("Context \"{}\" is {}", self.name(), ContextStatus::Stopped)
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(Context::name))
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load_profile(ctx: &Context) -> String {
        ctx.name().to_string()
    }

    #[test]
    fn test_local_read_write() {
        let initial = Context::new("initial");
        assert_eq!(initial.get("key1"), None);

        initial.set("key1", "value1");
        assert_eq!(initial.get("key1"), Some(json!("value1")));
        assert_eq!(initial.owner_of("key1"), Some(initial.clone()));
    }

    #[test]
    fn test_set_is_chainable() {
        let ctx = Context::new("root");
        ctx.set("a", 1).set("b", 2);
        assert_eq!(ctx.data().len(), 2);
    }

    #[test]
    fn test_nested_read_falls_through() {
        let initial = Context::new("initial");
        initial.set("key1", "value1");
        let nested = initial.enter("nested").unwrap();

        assert_eq!(nested.get("key1"), Some(json!("value1")));
        assert_eq!(nested.owner_of("key1"), Some(initial));
        assert!(!nested.contains_key("key1"));
    }

    #[test]
    fn test_nested_write_delegates_to_owner() {
        let initial = Context::new("initial");
        initial.set("key1", "value1");
        let nested = initial.enter("nested").unwrap();

        nested.set("key1", "nestInitialValue");
        assert_eq!(initial.get("key1"), Some(json!("nestInitialValue")));
        assert!(!nested.contains_key("key1"));
    }

    #[test]
    fn test_child_only_key_stays_local() {
        let initial = Context::new("initial");
        let nested = initial.enter("nested").unwrap();

        nested.set("nestKey", "nestValue");
        assert_eq!(nested.owner_of("nestKey"), Some(nested.clone()));
        assert_eq!(initial.get("nestKey"), None);
        assert_eq!(initial.owner_of("nestKey"), None);
    }

    #[test]
    fn test_falsy_values_are_present() {
        let root = Context::new("root");
        root.set("zero", 0).set("empty", "").set("no", false).set("nothing", Value::Null);
        let child = root.enter("child").unwrap();

        assert_eq!(child.get("zero"), Some(json!(0)));
        assert_eq!(child.get("empty"), Some(json!("")));
        assert_eq!(child.get("no"), Some(json!(false)));
        assert_eq!(child.get("nothing"), Some(Value::Null));
    }

    #[test]
    fn test_get_as() {
        let root = Context::new("root");
        root.set("count", 3);

        assert_eq!(root.get_as::<u32>("count").unwrap(), Some(3));
        assert_eq!(root.get_as::<u32>("missing").unwrap(), None);
        assert!(matches!(
            root.get_as::<String>("count"),
            Err(ScopeError::Decode { .. })
        ));
    }

    #[test]
    fn test_shared_data() {
        let data = ScopeData::new().with("seed", 1);
        let root = Context::with_data("root", data.clone());
        let sibling = root.enter_with("sibling", data.clone()).unwrap();

        sibling.set("extra", 2);
        assert!(root.contains_key("extra"));
        assert!(sibling.data().is_shared_with(root.data()));
    }

    #[test]
    fn test_leave_returns_parent() {
        let initial = Context::new("initial");
        let nested = initial.enter("nested").unwrap();

        let parent = nested.leave().unwrap();
        assert_eq!(nested.status(), ContextStatus::Stopped);
        assert_eq!(parent, Some(initial.clone()));
        assert!(nested.ended_at().is_some());

        assert_eq!(initial.leave().unwrap(), None);
    }

    #[test]
    fn test_stopped_context_rejects_lifecycle_calls() {
        let ctx = Context::new("done");
        ctx.leave().unwrap();

        let err = ctx.leave().unwrap_err();
        assert_eq!(err.message(), "Context \"done\" is stopped");
        assert!(ctx.enter("late").is_err());
        assert!(ctx.exec(|_| ()).is_err());
        assert!(ctx.exec_async(|_| async {}).is_err());
    }

    #[test]
    fn test_reads_allowed_after_stop() {
        let ctx = Context::new("done");
        ctx.set("k", "v");
        ctx.leave().unwrap();

        assert_eq!(ctx.get("k"), Some(json!("v")));
        assert_eq!(ctx.names(), vec!["done"]);
    }

    #[test]
    fn test_names_lineage() {
        let root = Context::new("root");
        let a = root.enter("a").unwrap();
        let b = a.enter("b").unwrap();
        assert_eq!(b.names(), vec!["root", "a", "b"]);
    }

    #[test]
    fn test_exec_returns_output_and_leaves_child() {
        let main = Context::new("main");
        let mut seen = None;

        let output = main
            .exec(|ctx| {
                assert!(ctx.is_started());
                seen = Some(ctx.clone());
                41
            })
            .unwrap();

        assert_eq!(output, 41);
        let child = seen.unwrap();
        assert_eq!(child.status(), ContextStatus::Stopped);
        assert_eq!(child.parent(), Some(&main));
        assert!(main.is_started());
    }

    #[test]
    fn test_exec_names_child_after_function() {
        let main = Context::new("main");
        assert_eq!(main.exec(load_profile).unwrap(), "load_profile");
        assert_eq!(
            main.exec_with(ExecOptions::named("explicit"), load_profile).unwrap(),
            "explicit"
        );
    }

    #[test]
    fn test_exec_closure_gets_anonymous_name() {
        let main = Context::new("main");
        let name = main.exec(|ctx| ctx.name().to_string()).unwrap();
        assert!(name.starts_with(crate::naming::ANONYMOUS_PREFIX));
    }

    fn run_in_generic<T>(main: &Context, _marker: T) -> String {
        main.exec(|ctx| ctx.name().to_string()).unwrap()
    }

    #[test]
    fn test_exec_unnamed_callables_get_anonymous_names() {
        let main = Context::new("main");
        let prefix = crate::naming::ANONYMOUS_PREFIX;

        let boxed: Box<dyn FnOnce(&Context) -> String> = Box::new(|ctx| ctx.name().to_string());
        assert!(main.exec(boxed).unwrap().starts_with(prefix));

        let pointer = load_profile as fn(&Context) -> String;
        assert!(main.exec(pointer).unwrap().starts_with(prefix));

        assert!(run_in_generic(&main, 1u8).starts_with(prefix));
    }

    #[test]
    fn test_exec_leaves_child_on_panic() {
        let main = Context::new("main");
        let mut seen = None;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            main.exec(|ctx| {
                seen = Some(ctx.clone());
                panic!("boom");
            })
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
        assert_eq!(seen.unwrap().status(), ContextStatus::Stopped);
        assert!(main.is_started());
    }

    #[test]
    fn test_try_exec_propagates_error_after_leave() {
        #[derive(Debug, PartialEq)]
        enum JobError {
            Failed(&'static str),
            Lifecycle(String),
        }

        impl From<AssertionError> for JobError {
            fn from(err: AssertionError) -> Self {
                JobError::Lifecycle(err.to_string())
            }
        }

        let main = Context::new("main");
        let mut seen = None;
        let result: Result<u32, JobError> = main.try_exec(|ctx| {
            seen = Some(ctx.clone());
            Err(JobError::Failed("X"))
        });

        assert_eq!(result, Err(JobError::Failed("X")));
        assert_eq!(seen.unwrap().status(), ContextStatus::Stopped);

        main.leave().unwrap();
        let result: Result<u32, JobError> = main.try_exec(|_| Ok(1));
        assert!(matches!(result, Err(JobError::Lifecycle(_))));
    }

    #[test]
    fn test_exec_tolerates_manual_leave() {
        let main = Context::new("main");
        let output = main
            .exec(|ctx| {
                ctx.leave().unwrap();
                "left early"
            })
            .unwrap();
        assert_eq!(output, "left early");
    }

    #[test]
    fn test_exec_capture_stores_result() {
        let main = Context::new("main");
        let child = main.exec_capture(|_| 31).unwrap();

        assert_eq!(child.status(), ContextStatus::Stopped);
        assert_eq!(child.get(RESULT_KEY), Some(json!(31)));
    }

    #[test]
    fn test_exec_with_shared_data() {
        let main = Context::new("main");
        let data = ScopeData::new();
        main.exec_with(ExecOptions::new().with_data(data.clone()), |ctx| {
            ctx.set("written", true);
        })
        .unwrap();
        assert_eq!(data.get("written"), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_exec_async_leaves_after_completion() {
        let main = Context::new("main");
        let scoped = main
            .exec_async(|ctx| async move {
                tokio::task::yield_now().await;
                ctx.set("progress", "done");
                30 + 1
            })
            .unwrap();

        let child = scoped.context().clone();
        assert!(child.is_started());
        assert_eq!(child.parent(), Some(&main));

        assert_eq!(scoped.await, 31);
        assert_eq!(child.status(), ContextStatus::Stopped);
        assert_eq!(child.get("progress"), Some(json!("done")));
    }

    #[tokio::test]
    async fn test_exec_async_leaves_after_error() {
        let main = Context::new("main");
        let scoped = main
            .exec_async_with(ExecOptions::named("fetch"), |_ctx| async {
                Err::<u32, String>("unreachable host".to_string())
            })
            .unwrap();
        let child = scoped.context().clone();

        assert_eq!(scoped.await, Err("unreachable host".to_string()));
        assert_eq!(child.name(), "fetch");
        assert_eq!(child.status(), ContextStatus::Stopped);
    }

    #[tokio::test]
    async fn test_exec_async_capture() {
        let main = Context::new("main");
        let child = main
            .exec_async_capture(|_ctx| async { 31 })
            .unwrap()
            .await;

        assert_eq!(child.status(), ContextStatus::Stopped);
        assert_eq!(child.get(RESULT_KEY), Some(json!(31)));
    }

    #[test]
    fn test_dropped_scoped_future_releases_child() {
        let main = Context::new("main");
        let scoped = main.exec_async(|_ctx| async { 1 }).unwrap();
        let child = scoped.context().clone();

        drop(scoped);
        assert_eq!(child.status(), ContextStatus::Stopped);
    }

    #[test]
    fn test_snapshot() {
        let root = Context::new("root");
        let child = root.enter("child").unwrap();
        child.set("k", 1);
        child.leave().unwrap();

        let snapshot = child.snapshot();
        assert_eq!(snapshot.id, child.id());
        assert_eq!(snapshot.parent_id, Some(root.id()));
        assert_eq!(snapshot.lineage, vec!["root", "child"]);
        assert_eq!(snapshot.status, ContextStatus::Stopped);
        assert!(snapshot.duration_ms.is_some());
        assert_eq!(snapshot.data["k"], json!(1));
    }
}
