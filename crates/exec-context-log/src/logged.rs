//! Scopes that carry their own logger.
//!
//! A [`LoggedContext`] pairs a [`Context`] with a logger tagged by the
//! scope's lineage. Children created through it get their own logger,
//! derived with the same [`LoggerConfig`], so nested work logs as
//! `main-funcA-funcB` without re-deriving anything.

use exec_context_core::{
    AssertionError, Context, ContextStatus, ExecOptions, ScopeData, ScopeLabel, ScopedFuture,
    RESULT_KEY,
};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::logger::Logger;

/// A [`Context`] with an attached logger.
#[derive(Clone)]
pub struct LoggedContext {
    context: Context,
    logger: Arc<dyn Logger>,
    config: LoggerConfig,
}

impl LoggedContext {
    /// Root scope logging to the console with the default separator
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, LoggerConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: LoggerConfig) -> Self {
        Self::from_context(Context::new(name), config)
    }

    /// Attach a logger derived from `context`'s lineage
    pub fn from_context(context: Context, config: LoggerConfig) -> Self {
        let logger = config.logger_for(&context);
        Self {
            context,
            logger,
            config,
        }
    }

    /// Attach an explicit logger. Children still derive theirs from the
    /// default config.
    pub fn with_logger(context: Context, logger: Arc<dyn Logger>) -> Self {
        Self {
            context,
            logger,
            config: LoggerConfig::default(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn log(&self, message: &str) {
        self.logger.log(message);
    }

    pub fn name(&self) -> &str {
        self.context.name()
    }

    pub fn names(&self) -> Vec<String> {
        self.context.names()
    }

    pub fn status(&self) -> ContextStatus {
        self.context.status()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.context.get(key)
    }

    pub fn owner_of(&self, key: &str) -> Option<Context> {
        self.context.owner_of(key)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.context.set(key, value);
        self
    }

    pub fn leave(&self) -> Result<Option<Context>, AssertionError> {
        self.context.leave()
    }

    /// Create a started child that logs under its own lineage.
    pub fn enter(&self, name: impl Into<String>) -> Result<LoggedContext, AssertionError> {
        self.enter_with(name, ScopeData::new())
    }

    pub fn enter_with(
        &self,
        name: impl Into<String>,
        data: ScopeData,
    ) -> Result<LoggedContext, AssertionError> {
        let child = self.context.enter_with(name, data)?;
        Ok(Self::from_context(child, self.config.clone()))
    }

    /// Same contract as [`Context::exec`], with a logged child.
    pub fn exec<F, R>(&self, func: F) -> Result<R, AssertionError>
    where
        F: FnOnce(&LoggedContext) -> R,
    {
        self.exec_with(ExecOptions::default(), func)
    }

    pub fn exec_with<F, R>(&self, options: ExecOptions, func: F) -> Result<R, AssertionError>
    where
        F: FnOnce(&LoggedContext) -> R,
    {
        let label = ScopeLabel::of(&func);
        self.context
            .exec_scoped(options, label, self.child_wrapper(), func)
            .map(|(_, output)| output)
    }

    /// Same contract as [`Context::exec_capture`]; returns the stopped,
    /// logged child.
    pub fn exec_capture<F, R>(&self, func: F) -> Result<LoggedContext, AssertionError>
    where
        F: FnOnce(&LoggedContext) -> R,
        R: Into<Value>,
    {
        let label = ScopeLabel::of(&func);
        self.context
            .exec_scoped(
                ExecOptions::default(),
                label,
                self.child_wrapper(),
                |ctx: &LoggedContext| {
                    let output = func(ctx);
                    ctx.set(RESULT_KEY, output);
                },
            )
            .map(|(child, ())| child)
    }

    /// Same contract as [`Context::try_exec`], with a logged child.
    pub fn try_exec<F, R, E>(&self, func: F) -> Result<R, E>
    where
        F: FnOnce(&LoggedContext) -> Result<R, E>,
        E: From<AssertionError>,
    {
        self.try_exec_with(ExecOptions::default(), func)
    }

    pub fn try_exec_with<F, R, E>(&self, options: ExecOptions, func: F) -> Result<R, E>
    where
        F: FnOnce(&LoggedContext) -> Result<R, E>,
        E: From<AssertionError>,
    {
        self.exec_with(options, func)?
    }

    /// Same contract as [`Context::exec_async`], with a logged child.
    pub fn exec_async<F, Fut>(&self, executor: F) -> Result<ScopedFuture<Fut>, AssertionError>
    where
        F: FnOnce(LoggedContext) -> Fut,
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
        F: FnOnce(LoggedContext) -> Fut,
        Fut: Future,
    {
        let label = ScopeLabel::of(&executor);
        self.context
            .exec_async_scoped(options, label, self.child_wrapper(), executor)
    }

    /// Same contract as [`Context::exec_async_capture`]; resolves to the
    /// stopped, logged child.
    pub fn exec_async_capture<F, Fut>(
        &self,
        executor: F,
    ) -> Result<impl Future<Output = LoggedContext>, AssertionError>
    where
        F: FnOnce(LoggedContext) -> Fut,
        Fut: Future,
        Fut::Output: Into<Value>,
    {
        let label = ScopeLabel::of(&executor);
        self.context.exec_async_scoped(
            ExecOptions::default(),
            label,
            self.child_wrapper(),
            move |ctx: LoggedContext| {
                let work = executor(ctx.clone());
                async move {
                    let output = work.await;
                    ctx.set(RESULT_KEY, output);
                    ctx
                }
            },
        )
    }

    fn child_wrapper(&self) -> impl FnOnce(Context) -> LoggedContext {
        let config = self.config.clone();
        move |child| Self::from_context(child, config)
    }
}

impl fmt::Debug for LoggedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedContext")
            .field("context", &self.context)
            .field("logger", &self.logger.name())
            .finish()
    }
}
