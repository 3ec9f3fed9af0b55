//! Guaranteed release of scopes created by guarded execution.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context as TaskContext, Poll};

use crate::context::Context;

/// Leaves its scope when released or dropped, whichever comes first.
///
/// Dropping covers unwinding out of the guarded work. A scope that was
/// already left by the work itself is not left a second time.
#[must_use = "the scope is left as soon as the guard is dropped"]
pub struct LeaveGuard {
    context: Context,
    armed: bool,
}

impl LeaveGuard {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            armed: true,
        }
    }

    /// The guarded scope
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Leave the scope now
    pub fn release(mut self) {
        self.settle();
    }

    fn settle(&mut self) {
        if !std::mem::replace(&mut self.armed, false) {
            return;
        }
        if let Err(err) = self.context.leave() {
            tracing::warn!(
                scope = %self.context.name(),
                error = %err,
                "scope was already left before its guard released it"
            );
        }
    }
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        self.settle();
    }
}

impl fmt::Debug for LeaveGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaveGuard")
            .field("scope", &self.context.name())
            .field("armed", &self.armed)
            .finish()
    }
}

/// Future returned by `exec_async`.
///
/// Resolves to the wrapped future's output and leaves the child scope as
/// soon as that output is ready. Dropping it early also leaves the scope.
#[must_use = "futures do nothing unless polled"]
pub struct ScopedFuture<Fut> {
    work: Pin<Box<Fut>>,
    guard: LeaveGuard,
}

impl<Fut> ScopedFuture<Fut> {
    pub fn new(guard: LeaveGuard, work: Fut) -> Self {
        Self {
            work: Box::pin(work),
            guard,
        }
    }

    /// The child scope the work runs in
    pub fn context(&self) -> &Context {
        self.guard.context()
    }
}

impl<Fut: Future> Future for ScopedFuture<Fut> {
    type Output = Fut::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let output = ready!(self.work.as_mut().poll(cx));
        if self.guard.armed {
            self.guard.settle();
            tracing::debug!(scope = %self.guard.context.name(), "async exec finished");
        }
        Poll::Ready(output)
    }
}

impl<Fut> fmt::Debug for ScopedFuture<Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedFuture")
            .field("context", self.context())
            .field("settled", &!self.guard.armed)
            .finish()
    }
}
